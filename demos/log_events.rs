//! Example program that lexes a MIDI file named on the command line and
//! logs every event the lexer reports

use mtrk::{
    chunk::header::HeaderData,
    lexer,
    music::{KeyMode, ScaleDegree},
    sink::EventSink,
    ChunkHeader,
};

/// Sink that logs each callback as it arrives
struct LoggingSink;

impl EventSink for LoggingSink {
    fn began(&mut self) {
        log::info!("began");
    }

    fn finished(&mut self) {
        log::info!("finished");
    }

    fn error_reading(&mut self) {
        log::error!("stream aborted mid-lex");
    }

    fn error_opening_file(&mut self) {
        log::error!("could not open input");
    }

    fn header(&mut self, header: HeaderData) {
        log::info!(
            "header: format {:?}, {} track(s), division {:?}",
            header.format,
            header.num_tracks,
            header.division
        );
    }

    fn track(&mut self, header: ChunkHeader) {
        let tag: String = header.chunk_type.iter().collect();
        log::info!("chunk {tag:?}, {} byte body", header.len());
    }

    fn note_off(&mut self, channel: u8, pitch: u8, velocity: u8, time: u32) {
        log::info!("note off ch{channel} pitch {pitch} vel {velocity} @{time}");
    }

    fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8, time: u32) {
        log::info!("note on  ch{channel} pitch {pitch} vel {velocity} @{time}");
    }

    fn polyphonic_after_touch(&mut self, channel: u8, pitch: u8, pressure: u8, time: u32) {
        log::info!("poly aftertouch ch{channel} pitch {pitch} pressure {pressure} @{time}");
    }

    fn control_change(&mut self, channel: u8, controller: u8, value: u8, time: u32) {
        log::info!("control change ch{channel} cc{controller} = {value} @{time}");
    }

    fn program_change(&mut self, channel: u8, program: u8, time: u32) {
        log::info!("program change ch{channel} program {program} @{time}");
    }

    fn channel_after_touch(&mut self, channel: u8, value: u8, time: u32) {
        log::info!("channel aftertouch ch{channel} value {value} @{time}");
    }

    fn pitch_wheel(&mut self, channel: u8, value: i16, absolute: u16, time: u32) {
        log::info!("pitch wheel ch{channel} {value:+} (raw {absolute:#06x}) @{time}");
    }

    fn sequence_number(&mut self, _channel: u8, number: u16, number_given: bool, time: u32) {
        if number_given {
            log::info!("sequence number {number} @{time}");
        } else {
            log::info!("sequence number (none given) @{time}");
        }
    }

    fn text(&mut self, _channel: u8, text: Vec<u8>, time: u32) {
        log::info!("text {:?} @{time}", String::from_utf8_lossy(&text));
    }

    fn copyright_text(&mut self, _channel: u8, text: Vec<u8>, time: u32) {
        log::info!("copyright {:?} @{time}", String::from_utf8_lossy(&text));
    }

    fn sequence_name(&mut self, _channel: u8, text: Vec<u8>, time: u32) {
        log::info!("sequence name {:?} @{time}", String::from_utf8_lossy(&text));
    }

    fn track_instrument_name(&mut self, _channel: u8, text: Vec<u8>, time: u32) {
        log::info!("instrument {:?} @{time}", String::from_utf8_lossy(&text));
    }

    fn lyric_text(&mut self, _channel: u8, text: Vec<u8>, time: u32) {
        log::info!("lyric {:?} @{time}", String::from_utf8_lossy(&text));
    }

    fn marker_text(&mut self, _channel: u8, text: Vec<u8>, time: u32) {
        log::info!("marker {:?} @{time}", String::from_utf8_lossy(&text));
    }

    fn cue_point_text(&mut self, _channel: u8, text: Vec<u8>, time: u32) {
        log::info!("cue point {:?} @{time}", String::from_utf8_lossy(&text));
    }

    fn end_of_track(&mut self, _channel: u8, time: u32) {
        log::info!("end of track @{time}");
    }

    fn tempo(&mut self, bpm: u32, microseconds_per_quarter_note: u32, time: u32) {
        log::info!("tempo {bpm} bpm ({microseconds_per_quarter_note} us/quarter) @{time}");
    }

    fn time_signature(
        &mut self,
        numerator: u8,
        denominator_exp: u8,
        clocks_per_click: u8,
        thirty_seconds_per_quarter: u8,
        time: u32,
    ) {
        log::info!(
            "time signature {numerator}/{} ({clocks_per_click} clocks/click, \
             {thirty_seconds_per_quarter} 32nds/quarter) @{time}",
            1u32 << denominator_exp
        );
    }

    fn key_signature(&mut self, degree: ScaleDegree, mode: KeyMode, sharps_or_flats: i8) {
        log::info!("key signature {degree:?} {mode:?} ({sharps_or_flats:+} sharps)");
    }
}

fn main() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let path = std::env::args()
        .nth(1)
        .expect("usage: log_events <file.mid>");

    if let Err(err) = lexer::lex(path.as_str(), LoggingSink) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
