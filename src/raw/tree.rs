//! Forwards dynamic-programming parse over binary search trees.
//!
//! One binary tree per hash bucket, ordered by the suffixes starting at the
//! stored positions. Inserting the current position re-roots its bucket's
//! tree while descending from the old root, so the structure doubles as the
//! match search: every node passed on the way down is a candidate, visited
//! nearest first, and the common-prefix lengths maintained for the two
//! descent boundaries give each comparison a running start. The same scheme
//! appears in LZMA and libdeflate.
//!
//! The parse itself runs left to right, relaxing `cost[i]` — the cheapest
//! encoding of the first `i` bytes — first with a literal step, then with
//! every viable length of the longest match found. Going forwards means the
//! work arrays cannot overlap and the cost of a position is only final once
//! the loop passes it, but in exchange the parse considers arriving at a
//! position from any earlier match, not just leaving it.

use super::cost::{hash4, literal_length_cost, match_cost};
use super::emit::{self, Step};
use super::{SearchParams, HASH_BITS, LAST_MATCH_GUARD, MAX_OFFSET, MIN_MATCH, NO_POS};

/// The tree parser, together with its work arrays. Grown on demand and
/// reused across blocks.
pub struct TreeParser {
    /// Tree roots, indexed by hash.
    head: Vec<u32>,
    /// Left and right child per position, interleaved.
    nodes: Vec<u32>,
    /// Cheapest encoded size of the first `i` bytes.
    cost: Vec<u32>,
    /// Source position of the chosen match, or the running literal count.
    mpos: Vec<u32>,
    /// Length of the step arriving at `i`; 1 means "arrived by literal".
    mlen: Vec<u32>,
}

impl TreeParser {
    pub fn new() -> Self {
        TreeParser {
            head: Vec::new(),
            nodes: Vec::new(),
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

        self.head.clear();
        self.head.resize(1 << HASH_BITS, NO_POS);
        self.nodes.resize(2 * n, NO_POS);

        self.cost.clear();
        self.cost.resize(n + 1, u32::MAX);
        self.cost[0] = 0;
        self.mlen.clear();
        self.mlen.resize(n + 1, 1);
        self.mpos.clear();
        self.mpos.resize(n + 1, 0);

        // Once a match of accept_len or more is found, positions up to its
        // end keep feeding the trees but skip the cost search.
        let mut next_match_cur = 0;

        for cur in 0..=last_match_pos {
            self.relax_literal(cur);

            if cur > next_match_cur {
                next_match_cur = cur;
            }

            let mut max_len = 3;
            let mut max_len_pos = NO_POS;

            // Unhook the old root; cur takes its place as we descend.
            let hash = hash4(&input[cur..], HASH_BITS);
            let mut pos = self.head[hash];
            self.head[hash] = cur as u32;

            let mut lt_slot = 2 * cur;
            let mut gt_slot = 2 * cur + 1;
            let mut lt_len = 0;
            let mut gt_len = 0;

            debug_assert!(pos == NO_POS || (pos as usize) < cur);

            // When this position only updates the tree, there is no point
            // comparing past accept_len.
            let len_limit = if cur == next_match_cur {
                n - cur - 5
            } else {
                params.accept_len.min(n - cur - 5)
            };
            let mut num_chain = params.max_depth;

            loop {
                // At the bottom, close off both boundary slots. Hitting the
                // depth limit also prunes the subtree we never searched and
                // cannot place.
                if pos == NO_POS || cur - pos as usize > MAX_OFFSET || num_chain == 0 {
                    self.nodes[lt_slot] = NO_POS;
                    self.nodes[gt_slot] = NO_POS;
                    break;
                }
                num_chain -= 1;
                let p = pos as usize;

                // The suffix here sorts between one that matched lt_len
                // bytes and one that matched gt_len, so it matches at least
                // the smaller of the two.
                let mut len = lt_len.min(gt_len);
                while len < len_limit && input[p + len] == input[cur + len] {
                    len += 1;
                }

                if cur == next_match_cur && len > max_len {
                    max_len = len;
                    max_len_pos = pos;
                    if len >= params.accept_len {
                        next_match_cur = cur + len;
                    }
                }

                // A full-limit match means the suffixes are equal as far as
                // anyone will ever compare them; cur is the equal, closer
                // stand-in, so it inherits both subtrees and pos drops out.
                if len >= params.accept_len || len == len_limit {
                    self.nodes[lt_slot] = self.nodes[2 * p];
                    self.nodes[gt_slot] = self.nodes[2 * p + 1];
                    break;
                }

                if input[p + len] < input[cur + len] {
                    // Everything in pos's left subtree is smaller than pos,
                    // which is smaller than cur: pos becomes the next node
                    // on the less-than boundary and the search continues in
                    // its right subtree.
                    self.nodes[lt_slot] = pos;
                    lt_slot = 2 * p + 1;
                    pos = self.nodes[lt_slot];
                    lt_len = len;
                } else {
                    self.nodes[gt_slot] = pos;
                    gt_slot = 2 * p;
                    pos = self.nodes[gt_slot];
                    gt_len = len;
                }
            }

            if max_len_pos != NO_POS {
                // Shortening a long match by up to 254 bytes can save one
                // length-extension byte, and a following left-extendable
                // match can absorb at most 254 given-up bytes before its own
                // extension grows. Lengths further below max_len never help.
                let min_len = if max_len > 254 + MIN_MATCH {
                    max_len - 254
                } else {
                    MIN_MATCH
                };
                let base = self.cost[cur];
                debug_assert!(base != u32::MAX);

                for i in min_len..=max_len {
                    let cost_there = base + match_cost(i) as u32;

                    // On a tie prefer the match: it can still swallow the
                    // literals in front of it.
                    if cost_there < self.cost[cur + i]
                        || (self.mlen[cur + i] == 1 && cost_there == self.cost[cur + i])
                    {
                        self.cost[cur + i] = cost_there;
                        self.mpos[cur + i] = max_len_pos;
                        self.mlen[cur + i] = i as u32;
                    }
                }
            }
        }

        for cur in last_match_pos + 1..n {
            self.relax_literal(cur);
        }

        // Recover the cheapest path backwards, then emit it forwards.
        let mut steps = Vec::new();
        let mut c = n;
        while c > 0 {
            let len = self.mlen[c] as usize;
            steps.push(if len == 1 {
                Step::Literal
            } else {
                Step::Match {
                    src: self.mpos[c] as usize,
                    len,
                }
            });
            c -= len;
        }
        steps.reverse();

        let written = emit::write_block(input, steps, output);
        // The cost model tracks the emitter exactly, except for the final
        // sequence's token which no match pays for.
        debug_assert_eq!(written, self.cost[n] as usize + 1);
        written
    }

    /// Relax arriving at `cur + 1` by taking one more literal. The running
    /// length of the literal run ending at `cur` is kept in `mpos`, so the
    /// marginal cost accounts for the run's length-extension bytes.
    fn relax_literal(&mut self, cur: usize) {
        if self.mlen[cur] == 1 {
            let run = self.mpos[cur] as usize;
            let marginal = (1 + literal_length_cost(run + 1) - literal_length_cost(run)) as u32;
            if self.cost[cur + 1] > self.cost[cur] + marginal {
                self.cost[cur + 1] = self.cost[cur] + marginal;
                self.mlen[cur + 1] = 1;
                self.mpos[cur + 1] = run as u32 + 1;
            }
        } else if self.cost[cur + 1] > self.cost[cur] + 1 {
            self.cost[cur + 1] = self.cost[cur] + 1;
            self.mlen[cur + 1] = 1;
            self.mpos[cur + 1] = 1;
        }
    }
}

impl Default for TreeParser {
    fn default() -> Self {
        Self::new()
    }
}
