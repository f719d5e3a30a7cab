//! High-ratio LZ4 compression and decompression in the legacy frame format.
//!
//! The LZ4 format is fixed and cheap to decode no matter who produced it;
//! where encoders differ is in how much of the match space they explore.
//! This crate spends CPU on exactly that: levels 5 through 9 run a backwards
//! dynamic-programming parse over hash chains of increasing depth, and level
//! 10 runs an exhaustive forwards parse over binary search trees that is
//! optimal under the format's cost model.
//!
//! Files use the legacy frame layout (magic `0x184C2102` plus
//! length-prefixed blocks of up to 8 MiB), so anything compressed here
//! decodes with the stock `lz4` tool, and vice versa for files it produced
//! in legacy mode.
//!
//! ```no_run
//! use std::fs::File;
//! use lz4_grind::{framed::CompressionSettings, Level};
//!
//! # fn main() -> std::io::Result<()> {
//! let input = File::open("data.bin")?;
//! let output = File::create("data.bin.lz4")?;
//! CompressionSettings::default()
//!     .level(Level::L9)
//!     .compress(input, output)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod framed;
pub mod raw;

pub use framed::{compress_frame, decompress_frame, CompressionSettings, FrameReader};
pub use raw::{
    compress_block, decompress_block, max_packed_size, BlockCompressor, DecodeError, InvalidLevel,
    Level, SearchParams,
};
