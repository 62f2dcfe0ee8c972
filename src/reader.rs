//! Byte source traits, allows in memory byte spans to be lexed or files

use std::{
    convert::Infallible,
    fs::File,
    io::{BufReader, Cursor, Read, Seek, SeekFrom},
    path::Path,
};

use crate::error::LexerError;

/// A seekable byte source the lexer pulls from.
///
/// Every fixed-size read issues exactly one read call against the
/// underlying stream: either that call delivers the full buffer or the
/// caller treats the stream as exhausted. There is no partial-read retry
/// logic. Seeking must be random-access, since skipping an unrecognized
/// chunk means jumping past its declared length.
pub trait MidiSource {
    /// Fills `buf` with a single read call, returning how many bytes were delivered
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, LexerError>;

    /// Seeks relative to the current position, returning the new absolute position
    fn skip(&mut self, offset: i64) -> Result<u64, LexerError>;

    /// Reports the current absolute position in the stream
    fn position(&mut self) -> Result<u64, LexerError>;
}

impl<T: Read + Seek> MidiSource for T {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, LexerError> {
        Ok(self.read(buf)?)
    }

    fn skip(&mut self, offset: i64) -> Result<u64, LexerError> {
        Ok(self.seek(SeekFrom::Current(offset))?)
    }

    fn position(&mut self) -> Result<u64, LexerError> {
        Ok(self.stream_position()?)
    }
}

/// Trait that allows for different types to be translated to a lexable MIDI source
pub trait MidiReadable {
    /// Error type that may be returned while opening the source
    type Error;
    /// Opens the value as a seekable byte source
    fn into_midi_source(self) -> Result<impl MidiSource, Self::Error>;
}

/// Wrapper struct to allow passing `Vec<u8>` to the [`MidiReadable`] trait
pub struct MidiData(pub Vec<u8>);

impl MidiReadable for MidiData {
    type Error = Infallible;
    fn into_midi_source(self) -> Result<impl MidiSource, Self::Error> {
        Ok(Cursor::new(self.0))
    }
}

impl<PATH> MidiReadable for PATH
where
    PATH: AsRef<Path>,
{
    type Error = std::io::Error;
    fn into_midi_source(self) -> Result<impl MidiSource, Self::Error> {
        let file = File::open(self.as_ref())?;
        Ok(BufReader::new(file))
    }
}
