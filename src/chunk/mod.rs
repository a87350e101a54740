//! chunked binary stream used by scenario files
//!
//! layout (little-endian):
//! - magic `CkMp`
//! - label table: `i32` count, then `{ u8 len, name, u32 id }` per label
//! - chunks: `u32 label id`, `u16 version`, `i32 size`, then `size` bytes,
//!   which may hold nested chunks

mod error;
mod input;
mod output;

pub use error::ChunkError;
pub use input::{DataChunkInfo, DataChunkInput, DataChunkParser};
pub use output::{fits_ascii_string, DataChunkOutput};

pub const CHUNK_MAGIC: &[u8; 4] = b"CkMp";

/// label id + version + data size
pub const CHUNK_HEADER_SIZE: u64 = 10;
