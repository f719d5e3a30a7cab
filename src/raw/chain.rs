//! Backwards dynamic-programming parse over hash chains.
//!
//! The parser works right to left. `cost[i]` is the cheapest encoding of
//! everything from position `i` to the end of the block, so by the time a
//! position is visited, the exact price of every way to leave it is already
//! known. At each position the match finder walks the hash chain of earlier
//! positions sharing the same four-byte hash, nearest first; since a farther
//! match can never encode a given length more cheaply than a nearer one, only
//! lengths beyond the best seen so far need pricing.
//!
//! When a match improves on the literal path it is also extended to the left
//! while the preceding bytes keep matching. That converts literals into match
//! bytes for free and finalizes the covered positions in one go, which is
//! where most of the ratio at low depths comes from.

use super::cost::{hash4, literal_length_cost, match_cost};
use super::emit::{self, Step};
use super::{SearchParams, HASH_BITS, LAST_MATCH_GUARD, MAX_OFFSET, NO_POS};

/// The chain parser used by levels 5 through 9, together with its work
/// arrays. The arrays are grown on demand and reused across blocks.
pub struct ChainParser {
    /// Chain heads, indexed by hash.
    head: Vec<u32>,
    /// Previous position with the same hash, per position.
    prev: Vec<u32>,
    /// Cheapest encoded size from each position to the end of the block.
    cost: Vec<u32>,
    /// Source position of the chosen match, or the running literal count.
    mpos: Vec<u32>,
    /// Length of the chosen step; 1 means "leave by literal".
    mlen: Vec<u32>,
}

impl ChainParser {
    pub fn new() -> Self {
        ChainParser {
            head: Vec::new(),
            prev: Vec::new(),
            cost: Vec::new(),
            mpos: Vec::new(),
            mlen: Vec::new(),
        }
    }

    /// Compress one block, appending to `output`; returns the number of
    /// bytes written. Never fails: blocks too short for matches become a
    /// single literal run.
    pub fn compress(&mut self, input: &[u8], output: &mut Vec<u8>, params: SearchParams) -> usize {
        let n = input.len();
        if n <= LAST_MATCH_GUARD {
            return emit::literal_only_block(input, output);
        }
        let last_match_pos = n - LAST_MATCH_GUARD;

        // Wider hashing pays off once the block outgrows the default table;
        // two table slots per input byte is the break-even point.
        let bits = if 2 * n < 1 << HASH_BITS {
            HASH_BITS
        } else {
            n.ilog2()
        };

        self.build_chains(input, last_match_pos, bits);

        self.cost.resize(n + 1, 0);
        self.mpos.resize(n, 0);
        self.mlen.resize(n, 0);

        // The final positions can only be literals: no match may start here.
        for i in 1..LAST_MATCH_GUARD {
            self.mlen[n - i] = 1;
            self.mpos[n - i] = i as u32;
            self.cost[n - i] = i as u32;
        }
        self.cost[n] = 0;

        let mut cur = last_match_pos;
        while cur > 0 {
            // Leaving by literal. The length of the literal run from here to
            // the next match is tracked in mpos so the marginal cost below
            // includes any length-extension byte the longer run needs.
            if self.mlen[cur + 1] == 1 {
                let run = self.mpos[cur + 1] as usize;
                let marginal = 1 + literal_length_cost(run + 1) - literal_length_cost(run);
                self.cost[cur] = self.cost[cur + 1] + marginal as u32;
                self.mlen[cur] = 1;
                self.mpos[cur] = run as u32 + 1;
            } else {
                self.cost[cur] = self.cost[cur + 1] + 1;
                self.mlen[cur] = 1;
                self.mpos[cur] = 1;
            }

            let mut pos = self.prev[cur];
            debug_assert!(pos == NO_POS || (pos as usize) < cur);

            let mut max_len = 3;
            let len_limit = n - cur - 5;
            let mut num_chain = params.max_depth;

            while pos != NO_POS && num_chain > 0 {
                num_chain -= 1;
                let p = pos as usize;
                if cur - p > MAX_OFFSET {
                    break;
                }

                // Skip unless this candidate can beat the best length so far.
                let mut len = 0;
                if max_len < len_limit && input[p + max_len] == input[cur + max_len] {
                    while len < len_limit && input[p + len] == input[cur + len] {
                        len += 1;
                    }
                }

                if len > max_len {
                    // Candidates come nearest-first, so any length up to
                    // max_len was already priced at an offset at most as
                    // large; only the extension can improve things.
                    let mut min_cost = u32::MAX;
                    let mut min_cost_len = 3;
                    for i in max_len + 1..=len {
                        let cost_here = match_cost(i) as u32 + self.cost[cur + i];
                        if cost_here < min_cost {
                            min_cost = cost_here;
                            min_cost_len = i;
                        }
                    }
                    max_len = len;

                    if min_cost < self.cost[cur] {
                        self.cost[cur] = min_cost;
                        self.mpos[cur] = pos;
                        self.mlen[cur] = min_cost_len as u32;

                        // Left-extend the match while the preceding bytes
                        // still agree. Each extended position is finalized
                        // here; the outer loop resumes below all of them.
                        if p > 0 && input[p - 1] == input[cur - 1] {
                            let mut src = p;
                            let mut len = min_cost_len;
                            loop {
                                cur -= 1;
                                src -= 1;
                                len += 1;
                                self.cost[cur] = match_cost(len) as u32 + self.cost[cur + len];
                                self.mpos[cur] = src as u32;
                                self.mlen[cur] = len as u32;
                                if src == 0 || input[src - 1] != input[cur - 1] {
                                    break;
                                }
                            }
                            break;
                        }
                    }
                }

                if len >= params.accept_len || len == len_limit {
                    break;
                }
                pos = self.prev[p];
            }

            cur -= 1;
        }

        self.mpos[0] = 0;
        self.mlen[0] = 1;

        // Walk the cheapest path forwards and emit it.
        let mlen = &self.mlen;
        let mpos = &self.mpos;
        let mut i = 0;
        let steps = std::iter::from_fn(move || {
            if i >= n {
                return None;
            }
            let len = mlen[i] as usize;
            let step = if len == 1 {
                Step::Literal
            } else {
                Step::Match {
                    src: mpos[i] as usize,
                    len,
                }
            };
            i += len;
            Some(step)
        });
        emit::write_block(input, steps, output)
    }

    /// Thread every position into the chain of positions sharing its hash.
    /// After this pass, following `prev` from any position yields strictly
    /// decreasing positions; hash collisions are filtered at match time.
    fn build_chains(&mut self, input: &[u8], last_match_pos: usize, bits: u32) {
        self.head.clear();
        self.head.resize(1 << bits, NO_POS);
        self.prev.resize(input.len(), NO_POS);

        for i in 0..=last_match_pos {
            let hash = hash4(&input[i..], bits);
            self.prev[i] = self.head[hash];
            self.head[hash] = i as u32;
        }
    }
}

impl Default for ChainParser {
    fn default() -> Self {
        Self::new()
    }
}
