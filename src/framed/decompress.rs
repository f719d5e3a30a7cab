use byteorder::{ReadBytesExt, LE};
use std::cmp;
use std::io::{self, BufRead, ErrorKind, Read};
use thiserror::Error;
use fehler::{throw, throws};

use super::{BLOCK_SIZE, MAGIC};
use crate::raw::{self, max_packed_size, DecodeError};

/// Errors when decompressing a legacy frame.
#[derive(Error, Debug)]
pub enum DecompressionError {
    #[error("error reading from the input you gave me")]
    InputError(#[from] io::Error),
    #[error("the raw LZ4 decompression failed (data corruption?)")]
    CodecError(#[from] DecodeError),
    #[error("wrong magic number in file header: {0:08x}")]
    WrongMagic(u32),
    #[error("a block length of {0} bytes exceeds anything a legal block can compress to")]
    BlockTooLong(u32),
}
type Error = DecompressionError; // do it this way for better docs

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        io::Error::new(ErrorKind::Other, e)
    }
}

/// Read a legacy LZ4 file, block by block.
#[derive(Debug)]
pub struct FrameReader<R: Read> {
    reader: R,
    read_buf: Vec<u8>,
    finished: bool,
}

impl<R: Read> FrameReader<R> {
    /// Wrap `reader` and consume the magic number.
    ///
    /// Decoding stops at the end of the underlying reader; concatenated
    /// frames are decoded in one go. If you want to read unrelated data
    /// following the LZ4 file, pass your reader by reference rather than by
    /// value.
    #[throws]
    pub fn new(mut reader: R) -> Self {
        let magic = reader.read_u32::<LE>()?;
        if magic != MAGIC {
            throw!(Error::WrongMagic(magic));
        }

        FrameReader {
            reader,
            read_buf: Vec::new(),
            finished: false,
        }
    }

    /// Decode the next block into `output`, which must be empty.
    ///
    /// Leaving `output` empty signals the end of the file.
    #[throws]
    pub fn decode_block(&mut self, output: &mut Vec<u8>) {
        assert!(output.is_empty(), "You must pass an empty buffer to this interface.");

        if self.finished {
            return;
        }

        loop {
            let mut header = [0u8; 4];
            if !read_header(&mut self.reader, &mut header)? {
                self.finished = true;
                return;
            }
            let block_length = u32::from_le_bytes(header);

            // A magic number in the length slot is the start of a
            // concatenated frame; carry on with its first block.
            if block_length == MAGIC {
                continue;
            }

            if block_length as usize > max_packed_size(BLOCK_SIZE) {
                throw!(Error::BlockTooLong(block_length));
            }

            let buf = &mut self.read_buf;
            buf.resize(block_length as usize, 0);
            self.reader.read_exact(buf.as_mut_slice())?;

            raw::decompress_block(buf, output, BLOCK_SIZE)?;

            // A block can legitimately decode to nothing; it just is not a
            // block worth reporting. Look at the next one.
            if !output.is_empty() {
                return;
            }
        }
    }

    /// Convert this `FrameReader` into something that implements
    /// `std::io::Read` and `std::io::BufRead`.
    pub fn into_read(self) -> FrameIoReader<R> {
        FrameIoReader {
            buffer: Vec::new(),
            bytes_taken: 0,
            frame_reader: self,
        }
    }
}

/// Reads exactly four header bytes, returning `false` on a clean end of
/// input before the first one. Running out anywhere inside the header is a
/// truncation error.
fn read_header<R: Read>(reader: &mut R, header: &mut [u8; 4]) -> io::Result<bool> {
    let n = reader.read(&mut header[..1])?;
    if n == 0 {
        return Ok(false);
    }
    reader.read_exact(&mut header[1..])?;
    Ok(true)
}

/// Wrapper around [`FrameReader`] that implements `Read` and `BufRead`.
pub struct FrameIoReader<R: Read> {
    frame_reader: FrameReader<R>,
    bytes_taken: usize,
    buffer: Vec<u8>,
}

impl<R: Read> Read for FrameIoReader<R> {
    #[throws(io::Error)]
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let mybuf = self.fill_buf()?;
        let bytes_to_take = cmp::min(mybuf.len(), buf.len());
        buf[..bytes_to_take].copy_from_slice(&mybuf[..bytes_to_take]);
        self.consume(bytes_to_take);
        bytes_to_take
    }
}

impl<R: Read> BufRead for FrameIoReader<R> {
    #[throws(io::Error)]
    fn fill_buf(&mut self) -> &[u8] {
        if self.bytes_taken == self.buffer.len() {
            self.buffer.clear();
            self.frame_reader.decode_block(&mut self.buffer)?;
            self.bytes_taken = 0;
        }
        &self.buffer[self.bytes_taken..]
    }

    fn consume(&mut self, amt: usize) {
        self.bytes_taken += amt;
        assert!(
            self.bytes_taken <= self.buffer.len(),
            "You consumed more bytes than I even gave you!"
        );
    }
}

/// Convenience wrapper around [`FrameReader`] that reads everything into a
/// vector and returns it.
#[throws]
pub fn decompress_frame<R: Read>(reader: R) -> Vec<u8> {
    let mut plaintext = Vec::new();
    FrameReader::new(reader)?
        .into_read()
        .read_to_end(&mut plaintext)?;
    plaintext
}
