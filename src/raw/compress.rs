//! Level selection and block compression entry points.

use thiserror::Error;

use super::chain::ChainParser;
use super::optimal::OptimalParser;

/// Worst-case compressed size of an `n`-byte block: incompressible input
/// costs one extension byte per 255 literals, plus a little framing slack.
pub fn max_packed_size(n: usize) -> usize {
    n + n / 255 + 16
}

/// The level requested does not exist.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("compression level {0} is not a thing; valid levels are 5 through 10")]
pub struct InvalidLevel(pub u32);

/// Compression effort.
///
/// Levels 5 through 9 run the backwards chain parser with progressively
/// deeper match searches. `Optimal` (level 10) runs the exhaustive tree
/// parser instead; it yields the best ratio this crate can produce but its
/// running time is unbounded in the block size.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum Level {
    L5,
    L6,
    L7,
    L8,
    L9,
    Optimal,
}

/// Limits on the match search, shared by both parser families.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchParams {
    /// Candidates examined per position before giving up.
    pub max_depth: usize,
    /// A match at least this long is taken without looking further.
    pub accept_len: usize,
}

impl SearchParams {
    /// No limits at all: visit every candidate, never stop early.
    pub const EXHAUSTIVE: SearchParams = SearchParams {
        max_depth: usize::MAX,
        accept_len: usize::MAX,
    };
}

impl Level {
    /// The numeric level, for a `u32` from a CLI flag or a config file.
    pub fn from_number(n: u32) -> Result<Self, InvalidLevel> {
        Ok(match n {
            5 => Level::L5,
            6 => Level::L6,
            7 => Level::L7,
            8 => Level::L8,
            9 => Level::L9,
            10 => Level::Optimal,
            _ => return Err(InvalidLevel(n)),
        })
    }

    pub fn number(self) -> u32 {
        match self {
            Level::L5 => 5,
            Level::L6 => 6,
            Level::L7 => 7,
            Level::L8 => 8,
            Level::L9 => 9,
            Level::Optimal => 10,
        }
    }

    /// The search limits this level stands for. Each step roughly trades an
    /// order of magnitude of search depth for ratio.
    pub fn search_params(self) -> SearchParams {
        let (max_depth, accept_len) = match self {
            Level::L5 => (1, 18),
            Level::L6 => (8, 32),
            Level::L7 => (64, 64),
            Level::L8 => (512, 128),
            Level::L9 => (4096, 256),
            Level::Optimal => return SearchParams::EXHAUSTIVE,
        };
        SearchParams {
            max_depth,
            accept_len,
        }
    }
}

/// The parser behind a level, with its reusable work arrays.
enum Engine {
    Chain(ChainParser, SearchParams),
    Optimal(OptimalParser),
}

/// A block compressor for one level.
///
/// Holds the parser's work arrays, which are grown on demand and reused, so
/// compressing a long stream block by block does not reallocate per block.
pub struct BlockCompressor {
    engine: Engine,
}

impl BlockCompressor {
    pub fn new(level: Level) -> Self {
        let engine = match level {
            Level::Optimal => Engine::Optimal(OptimalParser::new()),
            limited => Engine::Chain(ChainParser::new(), limited.search_params()),
        };
        BlockCompressor { engine }
    }

    /// Compress one block of at most 8 MiB, appending to `output`; returns
    /// the number of bytes written, which never exceeds
    /// [`max_packed_size`] of the input length. Compression cannot fail.
    pub fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> usize {
        match &mut self.engine {
            Engine::Chain(parser, params) => parser.compress(input, output, *params),
            Engine::Optimal(parser) => parser.compress(input, output),
        }
    }
}

/// One-shot convenience: compress a single block at `level`.
///
/// When compressing many blocks, build a [`BlockCompressor`] once instead.
pub fn compress_block(input: &[u8], output: &mut Vec<u8>, level: Level) -> usize {
    BlockCompressor::new(level).compress(input, output)
}
