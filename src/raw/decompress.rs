//! Decoding of raw LZ4 blocks.

use byteorder::{ReadBytesExt, LE};
use std::io::{self, Cursor, ErrorKind, Read};
use thiserror::Error;
use fehler::{throw, throws};

use super::MIN_MATCH;

/// Errors when decoding a raw LZ4 block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum DecodeError {
    #[error("Block stream ended in the middle of a sequence. Either your input was truncated or you're trying to decompress garbage.")]
    UnexpectedEnd,
    #[error("The offset for a match is zero. This is always invalid. You are probably decoding corrupted input.")]
    ZeroMatchOffset,
    #[error("The offset for a match points before the start of the block. Matches can only reference data within their own block.")]
    OffsetOutOfRange,
    #[error("Refusing to decode a block that declares more output than the caller allowed.")]
    OutputLimitExceeded,
}
type Error = DecodeError; // do it this way for better docs

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        // this is the only kind of IO error that can happen in this code as we are always reading from slices
        assert_eq!(e.kind(), ErrorKind::UnexpectedEof);
        Error::UnexpectedEnd
    }
}

/// A length field saturates at its token nibble; the remainder follows as a
/// run of 0xFF bytes terminated by a byte below 0xFF. Keep reading and
/// adding while it's all F.
#[throws]
fn read_extended(initial: u8, reader: &mut Cursor<&[u8]>) -> usize {
    let mut value: usize = initial.into();
    if value == 0xF {
        loop {
            let more = reader.read_u8()?;
            value += usize::from(more);
            if more != 0xFF {
                break;
            }
        }
    }
    value
}

/// Decompress a single LZ4 block, appending the decoded bytes to `output`.
///
/// Matches may only reference bytes decoded within this same call: blocks in
/// the legacy format are fully independent, so there is no dictionary or
/// prefix to pass, and anything already in `output` is invisible to the
/// decoder.
///
/// `output_limit` bounds how many bytes this call may append. It protects
/// against corrupt or malicious inputs, which can otherwise request absurd
/// amounts of output from a handful of compressed bytes.
#[throws]
pub fn decompress_block(input: &[u8], output: &mut Vec<u8>, output_limit: usize) {
    let block_start = output.len();
    let mut reader = Cursor::new(input);

    while let Ok(token) = reader.read_u8() {
        let literal_len = read_extended(token >> 4, &mut reader)?;

        if output.len() - block_start + literal_len > output_limit {
            throw!(Error::OutputLimitExceeded);
        }
        let output_pos = output.len();
        output.resize(output_pos + literal_len, 0);
        reader.read_exact(&mut output[output_pos..])?;

        // The final sequence of a block carries only literals.
        if reader.position() as usize == input.len() {
            break;
        }

        let offset = reader.read_u16::<LE>()? as usize;
        let match_len = MIN_MATCH + read_extended(token & 0xF, &mut reader)?;

        if output.len() - block_start + match_len > output_limit {
            throw!(Error::OutputLimitExceeded);
        }
        copy_match(output, block_start, offset, match_len)?;
    }
}

/// Append `match_len` bytes read from `offset` bytes before the current end
/// of `output`, never reaching back past `block_start`. Overlapping copies
/// must behave byte by byte: with `offset < match_len` the bytes written
/// early in the copy are read again later, which is how LZ4 encodes runs.
fn copy_match(
    output: &mut Vec<u8>,
    block_start: usize,
    offset: usize,
    match_len: usize,
) -> Result<(), Error> {
    let old_len = output.len();
    match offset {
        0 => return Err(Error::ZeroMatchOffset),
        o if o > old_len - block_start => return Err(Error::OffsetOutOfRange),

        // fastpath: memset if we repeat the same byte forever
        1 => output.resize(old_len + match_len, output[old_len - 1]),

        o if match_len <= o => {
            // fastpath: nonoverlapping
            // for borrowck reasons we have to extend with zeroes first and then memcpy
            // instead of simply using extend_from_slice
            output.resize(old_len + match_len, 0);
            let (head, tail) = output.split_at_mut(old_len);
            tail.copy_from_slice(&head[old_len - offset..][..match_len]);
        }
        2 | 4 | 8 => {
            // fastpath: overlapping but with a small period

            // build a 16 byte buffer so we can handle 16 bytes per iteration instead of one
            let mut buf = [0u8; 16];
            for chunk in buf.chunks_mut(offset) {
                chunk.copy_from_slice(&output[old_len - offset..][..offset]);
            }
            output.resize(old_len + match_len, 0);
            for target in output[old_len..].chunks_mut(buf.len()) {
                target.copy_from_slice(&buf[..target.len()]);
            }
        }
        _ => {
            // slowest path: copy single bytes
            output.reserve(match_len);
            for i in 0..match_len {
                let b = output[old_len - offset + i];
                output.push(b);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub mod test {
    use fehler::throws;
    use super::{decompress_block, Error};

    #[throws]
    pub fn decompress(input: &[u8]) -> Vec<u8> {
        let mut vec = Vec::new();
        decompress_block(input, &mut vec, usize::MAX)?;
        vec
    }

    #[test]
    fn aaaaaaaaaaa_lots_of_aaaaaaaaa() {
        assert_eq!(decompress(&[0x11, b'a', 1, 0]).unwrap(), b"aaaaaa");
    }

    #[test]
    fn multiple_repeated_blocks() {
        assert_eq!(
            decompress(&[0x11, b'a', 1, 0, 0x22, b'b', b'c', 2, 0]).unwrap(),
            b"aaaaaabcbcbcbc"
        );
    }

    #[test]
    fn all_literal() {
        assert_eq!(decompress(&[0x30, b'a', b'4', b'9']).unwrap(), b"a49");
    }

    #[test]
    fn empty_block_token() {
        assert_eq!(decompress(&[0x00]).unwrap(), b"");
    }

    #[test]
    fn overlapping_copy_with_odd_period() {
        // three literals, then a 9-byte match at offset 3
        assert_eq!(
            decompress(&[0x35, b'x', b'y', b'z', 3, 0]).unwrap(),
            b"xyzxyzxyzxyz"
        );
    }

    #[test]
    fn offset_oob() {
        decompress(&[0x10, b'a', 2, 0]).unwrap_err();
        decompress(&[0x40, b'a', 1, 0]).unwrap_err();
    }

    #[test]
    fn zero_offset_is_rejected() {
        assert_eq!(
            decompress(&[0x10, b'a', 0, 0]).unwrap_err(),
            Error::ZeroMatchOffset
        );
    }

    #[test]
    fn truncated_inputs_are_rejected() {
        // literal length says 2, only 1 byte follows
        assert_eq!(decompress(&[0x20, b'a']).unwrap_err(), Error::UnexpectedEnd);
        // half an offset
        assert_eq!(
            decompress(&[0x10, b'a', 1]).unwrap_err(),
            Error::UnexpectedEnd
        );
        // unterminated literal-length extension
        assert_eq!(decompress(&[0xF0, 0xFF]).unwrap_err(), Error::UnexpectedEnd);
    }

    #[test]
    fn offset_at_the_16_bit_limit_decodes() {
        // 65535 literals, then a match of 8 bytes reaching all the way back
        // to the first of them.
        let literals: Vec<u8> = (0..65535u32).map(|i| (i % 251) as u8).collect();

        let mut block = vec![0xF4]; // saturated literal nibble, match len 8
        let mut ext = 65535 - 15;
        while ext >= 0xFF {
            block.push(0xFF);
            ext -= 0xFF;
        }
        block.push(ext as u8);
        block.extend_from_slice(&literals);
        block.extend_from_slice(&0xFFFFu16.to_le_bytes());

        let out = decompress(&block).unwrap();
        assert_eq!(out.len(), 65535 + 8);
        assert_eq!(&out[..65535], &literals[..]);
        assert_eq!(&out[65535..], &literals[..8]);
    }

    #[test]
    fn output_limit_is_respected() {
        let mut out = Vec::new();
        let err = super::decompress_block(&[0x11, b'a', 1, 0], &mut out, 3).unwrap_err();
        assert_eq!(err, Error::OutputLimitExceeded);
    }

    #[test]
    fn decoding_ignores_bytes_already_in_the_output() {
        // appends after existing content without touching it
        let mut out = b"prefilled".to_vec();
        super::decompress_block(&[0x11, b'a', 1, 0], &mut out, usize::MAX).unwrap();
        assert_eq!(&out[..9], b"prefilled");
        assert_eq!(&out[9..], b"aaaaaa");

        // and matches cannot reach back into it
        let mut out = b"prefilled".to_vec();
        let err = super::decompress_block(&[0x10, b'a', 2, 0], &mut out, usize::MAX).unwrap_err();
        assert_eq!(err, Error::OffsetOutOfRange);
    }
}
