//! SMF header chunk data definitions and parsing

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{error::LexerError, primitives, reader::MidiSource};

/// Header chunk data: format, track count and time division, stored in
/// the file as 3 16 bit unsigned big-endian integers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeaderData {
    /// The MIDI format
    pub format: Format,
    /// Number of track chunks the file claims to hold
    pub num_tracks: u16,
    /// Meaning of delta-times in the sequence
    pub division: Division,
}

impl HeaderData {
    /// Parses the body of the header chunk.
    pub fn parse<S: MidiSource + ?Sized>(source: &mut S) -> Result<Self, LexerError> {
        let format = Format::try_from(primitives::read_u16(source)?)?;
        let num_tracks = primitives::read_u16(source)?;
        let division = Division::from(primitives::read_u16(source)?);

        Ok(Self {
            format,
            num_tracks,
            division,
        })
    }
}

/// The overall organization of the MIDI file. Only three values are
/// valid, making most of the 16 bits irrelevant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    /// The file contains a single multi-channel track
    Zero,
    /// The file contains one or more simultaneous tracks of a sequence
    One,
    /// The file contains one or more sequentially independent single-track patterns
    Two,
}

impl TryFrom<u16> for Format {
    type Error = LexerError;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Format::Zero),
            1 => Ok(Format::One),
            2 => Ok(Format::Two),
            _ => Err(LexerError::UnsupportedFormat),
        }
    }
}

/// The meaning of the delta-times in the MIDI sequence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Division {
    /// When bit 15 is a 0, bits 14-0 represent ticks per quarter note
    Metrical(u16),
    /// When bit 15 is a 1, bits 14-0 carry raw time-code data; the
    /// packed SMPTE fields are not decoded further
    TimeCode(u16),
}

impl From<u16> for Division {
    fn from(value: u16) -> Self {
        const MASK: u16 = 0x7FFF;

        if value & 0x8000 == 0 {
            Division::Metrical(value & MASK)
        } else {
            Division::TimeCode(value & MASK)
        }
    }
}
