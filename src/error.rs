//! Errors that may arise while lexing a MIDI stream

use thiserror::Error;

/// Errors surfaced by the lexer and the parsers beneath it.
///
/// Structural errors and mid-field truncation are both fatal: the lexer
/// aborts on the first one and makes no attempt to resynchronize. A clean
/// end of stream at a chunk boundary is not an error and never produces
/// one of these.
#[derive(Debug, Error)]
pub enum LexerError {
    /// The stream ended in the middle of a fixed-width or variable-length field
    #[error("unexpected end of file")]
    UnexpectedEndOfFile,
    /// The first chunk of the stream was not the SMF header chunk
    #[error("expected SMF MThd header")]
    ExpectedMthd,
    /// The SMF header declared a format other than 0, 1 or 2
    #[error("unsupported SMF format")]
    UnsupportedFormat,
    /// A fixed-length meta event declared a length its type does not allow
    #[error("unexpected event length: {0}")]
    UnexpectedEventLength(String),
    /// A variable-length quantity ran past the four byte cap
    #[error("variable-length quantity longer than four bytes")]
    VarLengthTooLong,
    /// A lexer was built without a byte source
    #[error("no byte source supplied")]
    MissingSource,
    /// A lexer was built without an event sink
    #[error("no event sink supplied")]
    MissingSink,
    /// The underlying byte source reported a fault of its own
    #[error("read error")]
    Io(#[from] std::io::Error),
}

impl From<std::convert::Infallible> for LexerError {
    fn from(value: std::convert::Infallible) -> Self {
        match value {}
    }
}
