use byteorder::{WriteBytesExt, LE};
use std::io::{self, ErrorKind, Read, Write};
use thiserror::Error;
use fehler::throws;

use super::{BLOCK_SIZE, MAGIC};
use crate::raw::{max_packed_size, BlockCompressor, Level};

/// Errors when compressing a legacy frame.
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("error reading from the input you gave me")]
    ReadError(#[source] io::Error),
    #[error("error writing to the output you gave me")]
    WriteError(#[from] io::Error),
}
type Error = CompressionError; // do it this way for better docs
impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        io::Error::new(ErrorKind::Other, e)
    }
}

/// A builder-style struct that configures compression settings.
/// This is how you produce legacy LZ4 files.
///
/// Create it using `Default::default()`.
pub struct CompressionSettings {
    level: Level,
    block_size: usize,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            level: Level::L5,
            block_size: BLOCK_SIZE,
        }
    }
}

impl CompressionSettings {
    /// How much effort to spend hunting for matches.
    ///
    /// The default is [`Level::L5`], the fastest of the deep-searching
    /// levels. See [`Level`] for the whole ladder.
    pub fn level(&mut self, v: Level) -> &mut Self {
        self.level = v;
        self
    }

    /// Uncompressed bytes per block.
    ///
    /// Matches cannot cross block boundaries, so smaller blocks trade ratio
    /// for peak memory. Going above the default 8 MiB is not possible:
    /// decoders only guarantee that much buffer per block.
    pub fn block_size(&mut self, v: usize) -> &mut Self {
        assert!(v != 0 && v <= BLOCK_SIZE, "invalid block size: {}", v);
        self.block_size = v;
        self
    }

    /// Read everything from `reader`, write one legacy frame to `writer`.
    #[throws]
    pub fn compress<R: Read, W: Write>(&self, mut reader: R, mut writer: W) {
        let mut compressor = BlockCompressor::new(self.level);
        let mut in_buffer = Vec::with_capacity(self.block_size);
        let mut out_buffer = Vec::with_capacity(max_packed_size(self.block_size));

        writer.write_u32::<LE>(MAGIC)?;

        loop {
            // We basically want read_exact semantics, except at the end.
            // Sadly read_exact specifies the buffer contents to be undefined
            // on error, so we use this construction instead.
            in_buffer.clear();
            reader
                .by_ref()
                .take(self.block_size as u64)
                .read_to_end(&mut in_buffer)
                .map_err(Error::ReadError)?;
            if in_buffer.is_empty() {
                break;
            }

            out_buffer.clear();
            let written = compressor.compress(&in_buffer, &mut out_buffer);
            debug_assert_eq!(written, out_buffer.len());
            debug_assert!(written <= max_packed_size(in_buffer.len()));

            writer.write_u32::<LE>(written as u32)?;
            writer.write_all(&out_buffer)?;

            log::debug!("block: {} -> {} bytes", in_buffer.len(), written);
        }
    }
}

/// Convenience wrapper: compress all of `reader` into `writer` as one frame.
#[throws]
pub fn compress_frame<R: Read, W: Write>(reader: R, writer: W, level: Level) {
    CompressionSettings::default()
        .level(level)
        .compress(reader, writer)?;
}
