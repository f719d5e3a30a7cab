//! The LZ4 legacy frame format.
//!
//! The earliest lz4 file format: a four-byte magic number followed by
//! compressed blocks, each prefixed with its four-byte little-endian length.
//! There are no checksums, no stored content size and no options — all of
//! that arrived with the later frame format, which this crate deliberately
//! does not speak.
//!
//! Blocks are compressed independently, so a frame can be decoded with a
//! fixed-size buffer. Files may be concatenated: a magic number sitting
//! where a block length belongs simply starts the next frame.

mod compress;
mod decompress;

/// The four magic bytes at the start of every legacy frame (little endian).
pub const MAGIC: u32 = 0x184C2102;

/// Uncompressed size of every block but the last one of a stream, and the
/// amount of buffer a decoder needs per block.
pub const BLOCK_SIZE: usize = 8 * 1024 * 1024;

pub use compress::*;
pub use decompress::*;
