//! The shared cost model and hash.
//!
//! Every parser in this crate scores candidate parses with the two functions
//! below, so "cheapest" means the same thing everywhere: the exact number of
//! bytes the emitter will produce. Literal bytes themselves are paid 1:1 and
//! are accounted by the parsers; these functions only price the framing
//! around them.

use byteorder::{ByteOrder, LE};

use super::MIN_MATCH;

/// Fibonacci hash of the four bytes at the start of `input`, reduced to
/// `bits` bits. The constant is a prime close to 2^32 / phi, which spreads
/// consecutive values well across the table.
#[inline]
pub(crate) fn hash4(input: &[u8], bits: u32) -> usize {
    debug_assert!(bits > 0 && bits <= 32);
    let v = LE::read_u32(input);
    (v.wrapping_mul(2654435761) >> (32 - bits)) as usize
}

/// Number of length-extension bytes needed to encode a literal run of
/// `nlit` bytes. Zero while the run still fits in the token nibble, then one
/// more byte for every further 255 literals.
#[inline]
pub(crate) fn literal_length_cost(nlit: usize) -> usize {
    if nlit < 15 {
        0
    } else {
        1 + (nlit - 15) / 255
    }
}

/// Total framing bytes contributed by a match of length `len`: its token,
/// the two offset bytes, and any length-extension bytes.
#[inline]
pub(crate) fn match_cost(len: usize) -> usize {
    debug_assert!(len >= MIN_MATCH);
    if len < 19 {
        3
    } else {
        4 + (len - 19) / 255
    }
}
