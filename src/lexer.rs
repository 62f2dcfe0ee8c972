//! The lexer state machine that drives parsing and reports to the sink

use crate::{
    chunk::{
        chunk_types::{HEADER_CHUNK, TRACK_DATA_CHUNK},
        header::HeaderData,
        track::{TrackContext, TrackEvent},
    },
    error::LexerError,
    reader::{MidiReadable, MidiSource},
    sink::EventSink,
    ChunkHeader,
};

/// Parse state of a [`Lexer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerState {
    /// At the start of the stream; the mandatory SMF header chunk is next
    ExpectHeader,
    /// Between chunks; any chunk may follow, or the stream may end
    ExpectChunk,
    /// Inside a track data chunk; a delta-time-tagged event is next
    ExpectTrackEvent,
    /// Terminal: the stream ended cleanly at a chunk boundary
    Done,
}

/// A Standard MIDI File lexer.
///
/// Feed it a seekable byte source and an [`EventSink`] and it scans the
/// stream one structural element per [`step`](Lexer::step), invoking the
/// matching sink method for everything it decodes. [`run`](Lexer::run)
/// drives stepping to completion for callers that don't need to pace it
/// themselves.
pub struct Lexer<S, C> {
    /// The seekable byte source being scanned
    source: S,
    /// Receiver of decoded events
    sink: C,
    /// Current parse state
    state: LexerState,
    /// Absolute offset of the end of the chunk currently being handled,
    /// used to bound skips over unrecognized chunk bodies
    next_chunk_boundary: u64,
    /// Tick counter and running status for the current track
    context: TrackContext,
}

impl<S: MidiSource, C: EventSink> Lexer<S, C> {
    /// Creates a lexer over `source`, reporting into `sink`
    pub fn new(source: S, sink: C) -> Self {
        Self {
            source,
            sink,
            state: LexerState::ExpectHeader,
            next_chunk_boundary: 0,
            context: TrackContext::default(),
        }
    }

    /// The current parse state, for drivers that introspect progress
    pub fn state(&self) -> LexerState {
        self.state
    }

    /// Borrows the sink
    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// Consumes the lexer, handing the sink back
    pub fn into_sink(self) -> C {
        self.sink
    }

    /// Runs the lexer to completion.
    ///
    /// The first fatal error aborts the run: `error_reading` fires on
    /// the sink and the error is handed back untouched. A clean end of
    /// stream at a chunk boundary finishes with `Ok`.
    pub fn run(&mut self) -> Result<(), LexerError> {
        loop {
            match self.step() {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(err) => {
                    self.sink.error_reading();
                    return Err(err);
                }
            }
        }
    }

    /// Lexes the next structural element: one chunk header, one SMF
    /// header or one track event.
    ///
    /// Returns `Ok(true)` once the stream has finished cleanly; stepping
    /// a finished lexer performs no reads and stays finished.
    pub fn step(&mut self) -> Result<bool, LexerError> {
        match self.state {
            LexerState::ExpectHeader => {
                let header = ChunkHeader::parse(&mut self.source)?
                    .ok_or(LexerError::UnexpectedEndOfFile)?;

                if header.chunk_type != HEADER_CHUNK {
                    return Err(LexerError::ExpectedMthd);
                }

                let data = HeaderData::parse(&mut self.source)?;
                self.sink.began();
                self.sink.header(data);
                self.state = LexerState::ExpectChunk;
            }

            LexerState::ExpectChunk => {
                // The one place a stream may legitimately run out.
                let Some(header) = ChunkHeader::parse(&mut self.source)? else {
                    self.sink.finished();
                    self.state = LexerState::Done;
                    return Ok(true);
                };

                let body_start = self.source.position()?;
                self.next_chunk_boundary = body_start + header.len() as u64;
                self.sink.track(header);

                if header.chunk_type == TRACK_DATA_CHUNK {
                    self.context.reset();
                    self.state = LexerState::ExpectTrackEvent;
                } else {
                    // Unrecognized chunk: jump to its boundary and expect
                    // another chunk right after it.
                    let offset = self.next_chunk_boundary - body_start;
                    self.source.skip(offset as i64)?;
                    self.next_chunk_boundary = 0;
                }
            }

            LexerState::ExpectTrackEvent => {
                if let Some(event) = TrackEvent::parse(&mut self.source, &mut self.context)? {
                    if let TrackEvent::EndOfTrack { .. } = event {
                        self.state = LexerState::ExpectChunk;
                    }
                    self.dispatch(event);
                }
            }

            LexerState::Done => return Ok(true),
        }

        Ok(false)
    }

    /// Routes a decoded event to its sink method
    fn dispatch(&mut self, event: TrackEvent) {
        match event {
            TrackEvent::NoteOff {
                channel,
                pitch,
                velocity,
                time,
            } => self.sink.note_off(channel, pitch, velocity, time),
            TrackEvent::NoteOn {
                channel,
                pitch,
                velocity,
                time,
            } => self.sink.note_on(channel, pitch, velocity, time),
            TrackEvent::PolyphonicAfterTouch {
                channel,
                pitch,
                pressure,
                time,
            } => self.sink.polyphonic_after_touch(channel, pitch, pressure, time),
            TrackEvent::ControlChange {
                channel,
                controller,
                value,
                time,
            } => self.sink.control_change(channel, controller, value, time),
            TrackEvent::ProgramChange {
                channel,
                program,
                time,
            } => self.sink.program_change(channel, program, time),
            TrackEvent::ChannelAfterTouch {
                channel,
                value,
                time,
            } => self.sink.channel_after_touch(channel, value, time),
            TrackEvent::PitchWheel {
                channel,
                value,
                absolute,
                time,
            } => self.sink.pitch_wheel(channel, value, absolute, time),
            TrackEvent::SequenceNumber {
                channel,
                number,
                number_given,
                time,
            } => self.sink.sequence_number(channel, number, number_given, time),
            TrackEvent::Text {
                channel,
                text,
                time,
            } => self.sink.text(channel, text, time),
            TrackEvent::CopyrightText {
                channel,
                text,
                time,
            } => self.sink.copyright_text(channel, text, time),
            TrackEvent::SequenceName {
                channel,
                text,
                time,
            } => self.sink.sequence_name(channel, text, time),
            TrackEvent::TrackInstrumentName {
                channel,
                text,
                time,
            } => self.sink.track_instrument_name(channel, text, time),
            TrackEvent::LyricText {
                channel,
                text,
                time,
            } => self.sink.lyric_text(channel, text, time),
            TrackEvent::MarkerText {
                channel,
                text,
                time,
            } => self.sink.marker_text(channel, text, time),
            TrackEvent::CuePointText {
                channel,
                text,
                time,
            } => self.sink.cue_point_text(channel, text, time),
            TrackEvent::EndOfTrack { channel, time } => self.sink.end_of_track(channel, time),
            TrackEvent::Tempo {
                bpm,
                microseconds_per_quarter_note,
                time,
            } => self.sink.tempo(bpm, microseconds_per_quarter_note, time),
            TrackEvent::TimeSignature {
                numerator,
                denominator_exp,
                clocks_per_click,
                thirty_seconds_per_quarter,
                time,
            } => self.sink.time_signature(
                numerator,
                denominator_exp,
                clocks_per_click,
                thirty_seconds_per_quarter,
                time,
            ),
            TrackEvent::KeySignature {
                degree,
                mode,
                sharps_or_flats,
            } => self.sink.key_signature(degree, mode, sharps_or_flats),
        }
    }
}

/// Builder that checks both collaborators are present before any
/// parsing can begin
pub struct LexerBuilder<S, C> {
    /// Byte source, once supplied
    source: Option<S>,
    /// Event sink, once supplied
    sink: Option<C>,
}

impl<S, C> Default for LexerBuilder<S, C> {
    fn default() -> Self {
        Self {
            source: None,
            sink: None,
        }
    }
}

impl<S, C> LexerBuilder<S, C> {
    /// An empty builder with neither collaborator supplied
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the byte source
    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    /// Supplies the event sink
    pub fn sink(mut self, sink: C) -> Self {
        self.sink = Some(sink);
        self
    }
}

impl<S: MidiSource, C: EventSink> LexerBuilder<S, C> {
    /// Builds the lexer, rejecting a missing collaborator before any
    /// parsing happens
    pub fn build(self) -> Result<Lexer<S, C>, LexerError> {
        let source = self.source.ok_or(LexerError::MissingSource)?;
        let sink = self.sink.ok_or(LexerError::MissingSink)?;
        Ok(Lexer::new(source, sink))
    }
}

/// Opens a MIDI source and runs a lexer over it to completion.
///
/// If the source cannot be opened, `error_opening_file` fires on the
/// sink and the underlying error is handed back. On success the sink is
/// returned for inspection.
pub fn lex<R, C>(readable: R, mut sink: C) -> Result<C, LexerError>
where
    R: MidiReadable,
    R::Error: Into<LexerError>,
    C: EventSink,
{
    let source = match readable.into_midi_source() {
        Ok(source) => source,
        Err(err) => {
            sink.error_opening_file();
            return Err(err.into());
        }
    };

    let mut lexer = Lexer::new(source, sink);
    lexer.run()?;
    Ok(lexer.into_sink())
}
