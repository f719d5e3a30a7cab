//! The raw LZ4 block format.
//!
//! A block is a sequence of tokens, each carrying a literal run and usually a
//! back-reference into the bytes decoded so far. The format itself is fixed;
//! what varies here is how hard the compressor works to pick the cheapest
//! possible segmentation of the input. All parsers in this module feed the
//! same cost model and the same emitter, so their outputs differ only in
//! which matches they found, never in how those matches are encoded.
//!
//! Blocks are fully independent: a match may only reference earlier bytes of
//! the same block.

mod chain;
mod compress;
mod cost;
mod decompress;
mod emit;
mod optimal;
mod tree;

pub use chain::ChainParser;
pub use compress::*;
pub use decompress::*;
pub use optimal::OptimalParser;
pub use tree::TreeParser;

/// Matches shorter than this cannot be encoded (the token biases match
/// lengths by 4).
pub(crate) const MIN_MATCH: usize = 4;

/// The offset field is 16 bits, so a match can reach at most this far back.
pub(crate) const MAX_OFFSET: usize = 65535;

/// No match may start closer than this to the end of a block, and the final
/// five bytes of a block are always literals. End-of-block rules of the
/// format; every encoder must obey them.
pub(crate) const LAST_MATCH_GUARD: usize = 12;

/// Width in bits of the hash indexing the match-finder tables. Values from
/// 10 to 18 work; 17 (128Ki heads) is a compromise between table reset cost
/// and collision rate.
pub(crate) const HASH_BITS: u32 = 17;

/// Sentinel stored in the hash, chain and tree tables for "no position".
pub(crate) const NO_POS: u32 = u32::MAX;
