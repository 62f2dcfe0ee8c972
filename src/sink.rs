//! The event sink: the callback surface the lexer reports through

use crate::{
    chunk::header::HeaderData,
    music::{KeyMode, ScaleDegree},
    ChunkHeader,
};

/// Receiver for everything the lexer decodes.
///
/// One method per event kind. Every method is side-effect-only and
/// defaults to doing nothing, so implementors override just the events
/// they care about; return values are deliberately absent because the
/// sink cannot influence lexing.
#[allow(unused_variables)]
pub trait EventSink {
    /// Lexing began: the mandatory header chunk was found
    fn began(&mut self) {}

    /// The stream ended cleanly at a chunk boundary
    fn finished(&mut self) {}

    /// Lexing aborted on a fatal error
    fn error_reading(&mut self) {}

    /// The file input could not be opened
    fn error_opening_file(&mut self) {}

    /// SMF header data, reported once per stream
    fn header(&mut self, header: HeaderData) {}

    /// A chunk header was encountered (usually a track)
    fn track(&mut self, header: ChunkHeader) {}

    /// A note was released
    fn note_off(&mut self, channel: u8, pitch: u8, velocity: u8, time: u32) {}

    /// A note was depressed
    fn note_on(&mut self, channel: u8, pitch: u8, velocity: u8, time: u32) {}

    /// Pressure change on an already-held note
    fn polyphonic_after_touch(&mut self, channel: u8, pitch: u8, pressure: u8, time: u32) {}

    /// A controller value changed
    fn control_change(&mut self, channel: u8, controller: u8, value: u8, time: u32) {}

    /// The patch number changed
    fn program_change(&mut self, channel: u8, program: u8, time: u32) {}

    /// Channel-wide pressure change
    fn channel_after_touch(&mut self, channel: u8, value: u8, time: u32) {}

    /// The pitch wheel moved; `value` is relative to the centre,
    /// `absolute` is the raw 14 bit value from the file
    fn pitch_wheel(&mut self, channel: u8, value: i16, absolute: u16, time: u32) {}

    /// Sequence number meta event; `number_given` is false for the
    /// legal zero-length form
    fn sequence_number(&mut self, channel: u8, number: u16, number_given: bool, time: u32) {}

    /// Free text; the payload is raw 8 bit data with no guaranteed encoding
    fn text(&mut self, channel: u8, text: Vec<u8>, time: u32) {}

    /// Copyright notice
    fn copyright_text(&mut self, channel: u8, text: Vec<u8>, time: u32) {}

    /// Sequence or track name
    fn sequence_name(&mut self, channel: u8, text: Vec<u8>, time: u32) {}

    /// Name of the track's instrumentation
    fn track_instrument_name(&mut self, channel: u8, text: Vec<u8>, time: u32) {}

    /// A lyric, usually one syllable
    fn lyric_text(&mut self, channel: u8, text: Vec<u8>, time: u32) {}

    /// A rehearsal or section marker
    fn marker_text(&mut self, channel: u8, text: Vec<u8>, time: u32) {}

    /// A cue describing something happening alongside the music
    fn cue_point_text(&mut self, channel: u8, text: Vec<u8>, time: u32) {}

    /// The current track ended
    fn end_of_track(&mut self, channel: u8, time: u32) {}

    /// Tempo change, as beats per minute and the raw microseconds per
    /// quarter note it was computed from
    fn tempo(&mut self, bpm: u32, microseconds_per_quarter_note: u32, time: u32) {}

    /// Time signature change; the denominator is a power-of-two exponent
    fn time_signature(
        &mut self,
        numerator: u8,
        denominator_exp: u8,
        clocks_per_click: u8,
        thirty_seconds_per_quarter: u8,
        time: u32,
    ) {
    }

    /// Key signature change, resolved to a scale degree and mode, with
    /// the raw sharps (positive) or flats (negative) count alongside
    fn key_signature(&mut self, degree: ScaleDegree, mode: KeyMode, sharps_or_flats: i8) {}
}
