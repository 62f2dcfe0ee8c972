//! Chunk header parsing and the decoders for known chunk bodies

use crate::{error::LexerError, primitives, reader::MidiSource, ChunkHeader};

pub mod chunk_types;
pub mod header;
pub mod track;

impl ChunkHeader {
    /// Parses a chunk header: four raw tag bytes, then a 32 bit
    /// big-endian length.
    ///
    /// Any four bytes are accepted as a tag. Returns `Ok(None)` when the
    /// stream holds no bytes at all, which is the one place a stream may
    /// legitimately end; a tag or length cut short partway through fails
    /// with [`LexerError::UnexpectedEndOfFile`].
    pub fn parse<S: MidiSource + ?Sized>(source: &mut S) -> Result<Option<Self>, LexerError> {
        let mut tag = [0u8; 4];

        let num = source.read_into(&mut tag)?;
        if num == 0 {
            return Ok(None);
        }
        if num != tag.len() {
            return Err(LexerError::UnexpectedEndOfFile);
        }

        let length = primitives::read_u32(source)?;

        Ok(Some(ChunkHeader {
            chunk_type: tag.map(char::from),
            length,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::{
        chunk::chunk_types::{HEADER_CHUNK, TRACK_DATA_CHUNK},
        error::LexerError,
        ChunkHeader,
    };

    #[test]
    fn header_chunk_tag_parses() {
        let mut source = Cursor::new(vec![0x4Du8, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06]);
        let header = ChunkHeader::parse(&mut source).unwrap().unwrap();

        assert_eq!(header.chunk_type, HEADER_CHUNK);
        assert_eq!(header.len(), 6);
    }

    #[test]
    fn track_chunk_tag_parses() {
        let mut source = Cursor::new(vec![0x4Du8, 0x54, 0x72, 0x6B, 0x00, 0x41, 0x89, 0x37]);
        let header = ChunkHeader::parse(&mut source).unwrap().unwrap();

        assert_eq!(header.chunk_type, TRACK_DATA_CHUNK);
        assert_eq!(header.len(), 4_294_967);
    }

    #[test]
    fn arbitrary_tags_are_accepted() {
        let mut source = Cursor::new(vec![0xDEu8, 0xAD, 0xBE, 0xEF, 0x00, 0x00, 0x00, 0x02]);
        let header = ChunkHeader::parse(&mut source).unwrap().unwrap();

        assert_eq!(header.len(), 2);
    }

    #[test]
    fn empty_stream_is_a_clean_end() {
        let mut source = Cursor::new(Vec::new());
        assert_eq!(ChunkHeader::parse(&mut source).unwrap(), None);
    }

    #[test]
    fn short_tag_is_a_truncation() {
        let mut source = Cursor::new(vec![0x4Du8, 0x54, 0x68]);
        let result = ChunkHeader::parse(&mut source);
        assert!(matches!(result, Err(LexerError::UnexpectedEndOfFile)));
    }

    #[test]
    fn short_length_is_a_truncation() {
        let mut source = Cursor::new(vec![0x4Du8, 0x54, 0x68, 0x64, 0x00, 0x00]);
        let result = ChunkHeader::parse(&mut source);
        assert!(matches!(result, Err(LexerError::UnexpectedEndOfFile)));
    }
}
