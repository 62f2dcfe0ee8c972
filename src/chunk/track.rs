//! Track event decoding, one delta-time-tagged event per invocation

pub mod meta;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::LexerError,
    music::{KeyMode, ScaleDegree},
    primitives,
    reader::MidiSource,
};

/// Mutable decoding state for the track currently being lexed.
///
/// The tick counter accumulates delta-times into an absolute position
/// within the track, and the running status remembers the most recent
/// channel-voice status byte so that consecutive messages of the same
/// type may omit theirs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackContext {
    /// Absolute tick position since the start of the current track
    pub time: u32,
    /// Most recent channel-voice status, split into (type, channel)
    running_status: Option<(u8, u8)>,
}

impl TrackContext {
    /// Resets the context for the start of a new track chunk
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A single decoded track event, tagged with the absolute tick position
/// at which it occurs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrackEvent {
    /// A note was released
    NoteOff {
        /// Channel the message addresses
        channel: u8,
        /// Note number
        pitch: u8,
        /// Release velocity
        velocity: u8,
        /// Absolute tick position
        time: u32,
    },
    /// A note was depressed
    NoteOn {
        /// Channel the message addresses
        channel: u8,
        /// Note number
        pitch: u8,
        /// Attack velocity
        velocity: u8,
        /// Absolute tick position
        time: u32,
    },
    /// Pressure change on an already-held note
    PolyphonicAfterTouch {
        /// Channel the message addresses
        channel: u8,
        /// Note number
        pitch: u8,
        /// Pressure amount
        pressure: u8,
        /// Absolute tick position
        time: u32,
    },
    /// A controller value changed
    ControlChange {
        /// Channel the message addresses
        channel: u8,
        /// Controller number
        controller: u8,
        /// New controller value
        value: u8,
        /// Absolute tick position
        time: u32,
    },
    /// The patch number changed
    ProgramChange {
        /// Channel the message addresses
        channel: u8,
        /// New program number
        program: u8,
        /// Absolute tick position
        time: u32,
    },
    /// Channel-wide pressure change
    ChannelAfterTouch {
        /// Channel the message addresses
        channel: u8,
        /// Pressure amount
        value: u8,
        /// Absolute tick position
        time: u32,
    },
    /// The pitch wheel moved
    PitchWheel {
        /// Channel the message addresses
        channel: u8,
        /// Signed value relative to the centre position
        value: i16,
        /// Raw 14 bit value as stored in the file
        absolute: u16,
        /// Absolute tick position
        time: u32,
    },
    /// Sequence number meta event, which may legally omit its number
    SequenceNumber {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// The sequence number, zero when not given
        number: u16,
        /// Whether a number was present at all
        number_given: bool,
        /// Absolute tick position
        time: u32,
    },
    /// Free text
    Text {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// Raw 8 bit text payload
        text: Vec<u8>,
        /// Absolute tick position
        time: u32,
    },
    /// Copyright notice
    CopyrightText {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// Raw 8 bit text payload
        text: Vec<u8>,
        /// Absolute tick position
        time: u32,
    },
    /// Sequence or track name
    SequenceName {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// Raw 8 bit text payload
        text: Vec<u8>,
        /// Absolute tick position
        time: u32,
    },
    /// Name of the track's instrumentation
    TrackInstrumentName {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// Raw 8 bit text payload
        text: Vec<u8>,
        /// Absolute tick position
        time: u32,
    },
    /// A lyric, usually one syllable
    LyricText {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// Raw 8 bit text payload
        text: Vec<u8>,
        /// Absolute tick position
        time: u32,
    },
    /// A rehearsal or section marker
    MarkerText {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// Raw 8 bit text payload
        text: Vec<u8>,
        /// Absolute tick position
        time: u32,
    },
    /// A cue describing something happening alongside the music
    CuePointText {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// Raw 8 bit text payload
        text: Vec<u8>,
        /// Absolute tick position
        time: u32,
    },
    /// The current track ended
    EndOfTrack {
        /// Low status nibble, 0xF for meta events
        channel: u8,
        /// Absolute tick position
        time: u32,
    },
    /// Tempo change
    Tempo {
        /// Beats per minute, rounded down
        bpm: u32,
        /// Raw microseconds per quarter note
        microseconds_per_quarter_note: u32,
        /// Absolute tick position
        time: u32,
    },
    /// Time signature change
    TimeSignature {
        /// Numerator of the signature
        numerator: u8,
        /// Denominator as a power-of-two exponent
        denominator_exp: u8,
        /// MIDI clocks per metronome click
        clocks_per_click: u8,
        /// Notated 32nd notes per MIDI quarter note
        thirty_seconds_per_quarter: u8,
        /// Absolute tick position
        time: u32,
    },
    /// Key signature change, resolved via the circle of fifths
    KeySignature {
        /// Scale degree of the key's tonic
        degree: ScaleDegree,
        /// Major or minor
        mode: KeyMode,
        /// Raw signed count: sharps positive, flats negative
        sharps_or_flats: i8,
    },
}

impl TrackEvent {
    /// Decodes exactly one delta-time-tagged event from the source.
    ///
    /// Returns `Ok(None)` when the bytes consumed carried nothing to
    /// report: unknown meta commands, system message subtypes and data
    /// bytes with no running status in effect are all length-skipped
    /// rather than treated as structural errors.
    pub fn parse<S: MidiSource + ?Sized>(
        source: &mut S,
        context: &mut TrackContext,
    ) -> Result<Option<Self>, LexerError> {
        let delta = primitives::read_var_length(source)?;
        context.time = context.time.wrapping_add(delta);

        let status = primitives::read_u8(source)?;
        let (message_type, channel) = if status & 0x80 != 0 {
            let split = primitives::split_status_byte(status);
            // Channel-voice statuses arm running status; system and
            // meta statuses cancel it.
            match split.0 {
                0x8..=0xE => context.running_status = Some(split),
                _ => context.running_status = None,
            }
            split
        } else {
            match context.running_status {
                Some(split) => {
                    // A data byte under running status: step back so the
                    // message decoder below re-reads it as its first
                    // data byte.
                    source.skip(-1)?;
                    split
                }
                None => return Self::skip_unknown(source),
            }
        };

        let time = context.time;
        match message_type {
            0x8 => {
                let (pitch, velocity) = primitives::read_two_u7(source)?;
                Ok(Some(TrackEvent::NoteOff {
                    channel,
                    pitch,
                    velocity,
                    time,
                }))
            }
            0x9 => {
                let (pitch, velocity) = primitives::read_two_u7(source)?;
                Ok(Some(TrackEvent::NoteOn {
                    channel,
                    pitch,
                    velocity,
                    time,
                }))
            }
            0xA => {
                let (pitch, pressure) = primitives::read_two_u7(source)?;
                Ok(Some(TrackEvent::PolyphonicAfterTouch {
                    channel,
                    pitch,
                    pressure,
                    time,
                }))
            }
            0xB => {
                let (controller, value) = primitives::read_two_u7(source)?;
                Ok(Some(TrackEvent::ControlChange {
                    channel,
                    controller,
                    value,
                    time,
                }))
            }
            0xC => {
                let program = primitives::read_u7(source)?;
                Ok(Some(TrackEvent::ProgramChange {
                    channel,
                    program,
                    time,
                }))
            }
            0xD => {
                let value = primitives::read_u7(source)?;
                Ok(Some(TrackEvent::ChannelAfterTouch {
                    channel,
                    value,
                    time,
                }))
            }
            0xE => {
                let (value, absolute) = primitives::read_pitch_wheel(source)?;
                Ok(Some(TrackEvent::PitchWheel {
                    channel,
                    value,
                    absolute,
                    time,
                }))
            }
            // The low nibble is not a channel here: 0xF selects meta
            // events, anything else a system subtype left undecoded.
            0xF if channel == 0xF => meta::parse_meta_event(source, channel, time),
            _ => Self::skip_unknown(source),
        }
    }

    /// Consumes an unrecognized message: a variable-length byte count
    /// followed by exactly that many bytes, none of them reported
    fn skip_unknown<S: MidiSource + ?Sized>(source: &mut S) -> Result<Option<Self>, LexerError> {
        let length = primitives::read_var_length(source)?;
        source.skip(i64::from(length))?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{TrackContext, TrackEvent};
    use crate::reader::MidiSource;

    /// Parses a single event from raw bytes with a fresh context
    fn parse_one(bytes: &[u8]) -> Option<TrackEvent> {
        let mut source = Cursor::new(bytes.to_vec());
        let mut context = TrackContext::default();
        TrackEvent::parse(&mut source, &mut context).unwrap()
    }

    #[test]
    fn note_off_parses() {
        let event = parse_one(&[0x40, 0x85, 0x04, 0x03]);
        assert_eq!(
            event,
            Some(TrackEvent::NoteOff {
                channel: 5,
                pitch: 4,
                velocity: 3,
                time: 0x40,
            })
        );
    }

    #[test]
    fn note_on_parses() {
        let event = parse_one(&[0x40, 0x95, 0x04, 0x03]);
        assert_eq!(
            event,
            Some(TrackEvent::NoteOn {
                channel: 5,
                pitch: 4,
                velocity: 3,
                time: 0x40,
            })
        );
    }

    #[test]
    fn polyphonic_after_touch_parses() {
        let event = parse_one(&[0x40, 0xA7, 0x12, 0x34]);
        assert_eq!(
            event,
            Some(TrackEvent::PolyphonicAfterTouch {
                channel: 7,
                pitch: 0x12,
                pressure: 0x34,
                time: 0x40,
            })
        );
    }

    #[test]
    fn control_change_parses() {
        let event = parse_one(&[0x00, 0xB2, 0x07, 0x64]);
        assert_eq!(
            event,
            Some(TrackEvent::ControlChange {
                channel: 2,
                controller: 7,
                value: 0x64,
                time: 0,
            })
        );
    }

    #[test]
    fn program_change_parses() {
        let event = parse_one(&[0x00, 0xC1, 0x2A]);
        assert_eq!(
            event,
            Some(TrackEvent::ProgramChange {
                channel: 1,
                program: 0x2A,
                time: 0,
            })
        );
    }

    #[test]
    fn channel_after_touch_parses() {
        let event = parse_one(&[0x40, 0xD8, 0x56]);
        assert_eq!(
            event,
            Some(TrackEvent::ChannelAfterTouch {
                channel: 8,
                value: 0x56,
                time: 0x40,
            })
        );
    }

    #[test]
    fn pitch_wheel_parses() {
        let event = parse_one(&[0x20, 0xE8, 0x34, 0x24]);
        assert_eq!(
            event,
            Some(TrackEvent::PitchWheel {
                channel: 8,
                value: -0xDCC,
                absolute: 0x1234,
                time: 0x20,
            })
        );
    }

    #[test]
    fn delta_times_accumulate_across_events() {
        let mut source = Cursor::new(vec![
            0x10, 0xE9, 0x00, 0x40, // delta 0x10
            0x20, 0xE8, 0x34, 0x24, // delta 0x20
            0x50, 0xE7, 0x00, 0x40, // delta 0x50
        ]);
        let mut context = TrackContext::default();

        let times: Vec<u32> = (0..3)
            .map(|_| {
                match TrackEvent::parse(&mut source, &mut context).unwrap() {
                    Some(TrackEvent::PitchWheel { time, .. }) => time,
                    other => panic!("expected a pitch wheel event, got {other:?}"),
                }
            })
            .collect();

        assert_eq!(times, vec![0x10, 0x30, 0x80]);
    }

    #[test]
    fn running_status_reuses_the_previous_status() {
        let mut source = Cursor::new(vec![
            0x00, 0x93, 0x3C, 0x60, // NoteOn with a status byte
            0x40, 0x3E, 0x60, // status omitted, still NoteOn on channel 3
        ]);
        let mut context = TrackContext::default();

        let first = TrackEvent::parse(&mut source, &mut context).unwrap();
        assert_eq!(
            first,
            Some(TrackEvent::NoteOn {
                channel: 3,
                pitch: 0x3C,
                velocity: 0x60,
                time: 0,
            })
        );

        let second = TrackEvent::parse(&mut source, &mut context).unwrap();
        assert_eq!(
            second,
            Some(TrackEvent::NoteOn {
                channel: 3,
                pitch: 0x3E,
                velocity: 0x60,
                time: 0x40,
            })
        );
    }

    #[test]
    fn meta_event_cancels_running_status() {
        let mut source = Cursor::new(vec![
            0x00, 0x93, 0x3C, 0x60, // NoteOn arms running status
            0x00, 0xFF, 0x06, 0x01, b'A', // marker text cancels it
            0x00, 0x3E, 0x02, 0x00, 0x00, // data byte now length-skips
        ]);
        let mut context = TrackContext::default();

        TrackEvent::parse(&mut source, &mut context).unwrap();
        TrackEvent::parse(&mut source, &mut context).unwrap();

        let third = TrackEvent::parse(&mut source, &mut context).unwrap();
        assert_eq!(third, None);
    }

    #[test]
    fn data_byte_without_running_status_is_skipped() {
        // 0x03 is no status: the following length byte says skip two.
        let mut source = Cursor::new(vec![0x00, 0x03, 0x02, 0xAA, 0xBB, 0x7F]);
        let mut context = TrackContext::default();

        let event = TrackEvent::parse(&mut source, &mut context).unwrap();
        assert_eq!(event, None);
        assert_eq!(MidiSource::position(&mut source).unwrap(), 5);
    }

    #[test]
    fn system_subtype_is_length_skipped() {
        // 0xF0 system exclusive: length 3, then the payload.
        let mut source = Cursor::new(vec![0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7]);
        let mut context = TrackContext::default();

        let event = TrackEvent::parse(&mut source, &mut context).unwrap();
        assert_eq!(event, None);
        assert_eq!(MidiSource::position(&mut source).unwrap(), 6);
    }

    #[test]
    fn truncated_event_is_an_error() {
        let mut source = Cursor::new(vec![0x40, 0x85, 0x04]);
        let mut context = TrackContext::default();

        let result = TrackEvent::parse(&mut source, &mut context);
        assert!(result.is_err());
    }
}
