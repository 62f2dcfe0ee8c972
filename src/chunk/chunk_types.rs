//! Chunk type constants

/// Chunk type introducing the mandatory SMF header chunk
pub const HEADER_CHUNK: [char; 4] = ['M', 'T', 'h', 'd'];

/// Chunk type introducing a track data chunk
pub const TRACK_DATA_CHUNK: [char; 4] = ['M', 'T', 'r', 'k'];
