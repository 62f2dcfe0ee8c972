//! Meta event sub-decoding with per-command length validation

use super::TrackEvent;
use crate::{
    error::LexerError,
    music::{self, KeyMode},
    primitives,
    reader::MidiSource,
};

/// Microseconds in a minute, for the beats-per-minute conversion
const MICROSECONDS_PER_MINUTE: u32 = 60_000_000;

/// Decodes the body of a meta event, the 0xFF status byte having already
/// been consumed.
///
/// Commands that are recognized but carry nothing to report, and
/// commands nobody recognizes at all, return `Ok(None)` with their
/// length-prefixed payloads consumed, so an unfamiliar command never
/// desynchronizes the stream.
pub(crate) fn parse_meta_event<S: MidiSource + ?Sized>(
    source: &mut S,
    channel: u8,
    time: u32,
) -> Result<Option<TrackEvent>, LexerError> {
    let command = primitives::read_u8(source)?;

    match command {
        0x00 => parse_sequence_number(source, channel, time),
        0x01..=0x07 => {
            let text = primitives::read_text(source)?;
            Ok(Some(match command {
                0x01 => TrackEvent::Text {
                    channel,
                    text,
                    time,
                },
                0x02 => TrackEvent::CopyrightText {
                    channel,
                    text,
                    time,
                },
                0x03 => TrackEvent::SequenceName {
                    channel,
                    text,
                    time,
                },
                0x04 => TrackEvent::TrackInstrumentName {
                    channel,
                    text,
                    time,
                },
                0x05 => TrackEvent::LyricText {
                    channel,
                    text,
                    time,
                },
                0x06 => TrackEvent::MarkerText {
                    channel,
                    text,
                    time,
                },
                _ => TrackEvent::CuePointText {
                    channel,
                    text,
                    time,
                },
            }))
        }
        // Obsolete channel and port prefixes: a single byte to discard.
        0x20 | 0x21 => {
            require_length(source, 1, "channel/port prefix")?;
            primitives::read_u8(source)?;
            Ok(None)
        }
        0x2F => {
            require_length(source, 0, "end of track")?;
            Ok(Some(TrackEvent::EndOfTrack { channel, time }))
        }
        0x51 => {
            require_length(source, 3, "set tempo")?;
            let microseconds = primitives::read_u24(source)?;
            let bpm = MICROSECONDS_PER_MINUTE.checked_div(microseconds).unwrap_or(0);
            Ok(Some(TrackEvent::Tempo {
                bpm,
                microseconds_per_quarter_note: microseconds,
                time,
            }))
        }
        0x58 => {
            require_length(source, 4, "time signature")?;
            let numerator = primitives::read_u8(source)?;
            let denominator_exp = primitives::read_u8(source)?;
            let clocks_per_click = primitives::read_u8(source)?;
            let thirty_seconds_per_quarter = primitives::read_u8(source)?;
            Ok(Some(TrackEvent::TimeSignature {
                numerator,
                denominator_exp,
                clocks_per_click,
                thirty_seconds_per_quarter,
                time,
            }))
        }
        0x59 => {
            require_length(source, 2, "key signature")?;
            let sharps_or_flats = primitives::read_u8(source)? as i8;
            let mode = KeyMode::from(primitives::read_u8(source)?);
            let (degree, mode) = music::key_from_sharps_or_flats(sharps_or_flats, mode);
            Ok(Some(TrackEvent::KeySignature {
                degree,
                mode,
                sharps_or_flats,
            }))
        }
        // Realtime bytes carry no payload at all.
        0xF8 | 0xFA | 0xFB | 0xFC => Ok(None),
        // Sequencer-specific data (0x7F) and every unrecognized command:
        // a length prefix followed by a payload nothing here decodes.
        _ => {
            let length = primitives::read_var_length(source)?;
            source.skip(i64::from(length))?;
            Ok(None)
        }
    }
}

/// Sequence numbers are either absent (length 0) or a 16 bit value
/// (length 2); anything else is a length error
fn parse_sequence_number<S: MidiSource + ?Sized>(
    source: &mut S,
    channel: u8,
    time: u32,
) -> Result<Option<TrackEvent>, LexerError> {
    let length = primitives::read_u8(source)?;

    match length {
        0 => Ok(Some(TrackEvent::SequenceNumber {
            channel,
            number: 0,
            number_given: false,
            time,
        })),
        2 => {
            let number = primitives::read_u16(source)?;
            Ok(Some(TrackEvent::SequenceNumber {
                channel,
                number,
                number_given: true,
                time,
            }))
        }
        other => Err(LexerError::UnexpectedEventLength(format!(
            "sequence number declared {other} bytes, expected 0 or 2"
        ))),
    }
}

/// Reads an event length and checks it against what the command requires
fn require_length<S: MidiSource + ?Sized>(
    source: &mut S,
    expected: u32,
    what: &str,
) -> Result<(), LexerError> {
    let length = primitives::read_var_length(source)?;

    if length != expected {
        return Err(LexerError::UnexpectedEventLength(format!(
            "{what} declared {length} bytes, expected {expected}"
        )));
    }

    Ok(())
}
