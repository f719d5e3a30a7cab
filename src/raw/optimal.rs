//! The maximum-effort parser.
//!
//! This is the tree parser with every search limit removed: all candidates
//! in a bucket are visited and no match is accepted early. Under the shared
//! cost model the result is the cheapest parse over the matches the trees
//! can enumerate, so its output is never larger than the tree parser's at
//! any finite parameters.

use super::tree::TreeParser;
use super::SearchParams;

/// The exhaustive parser behind the highest compression level.
pub struct OptimalParser {
    inner: TreeParser,
}

impl OptimalParser {
    pub fn new() -> Self {
        OptimalParser {
            inner: TreeParser::new(),
        }
    }

    /// Compress one block, appending to `output`; returns the number of
    /// bytes written.
    ///
    /// There is no bound on the work done per position, so large blocks with
    /// many repeated substrings can take a very long time.
    pub fn compress(&mut self, input: &[u8], output: &mut Vec<u8>) -> usize {
        self.inner.compress(input, output, SearchParams::EXHAUSTIVE)
    }
}

impl Default for OptimalParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::chain::ChainParser;
    use super::super::decompress::test::decompress;
    use super::super::tree::TreeParser;
    use super::super::SearchParams;
    use super::OptimalParser;

    /// A structured input with matches at several distances and lengths.
    fn wobbly_input() -> Vec<u8> {
        let mut input = Vec::new();
        for i in 0..600u32 {
            let phrase: &[u8] = match i % 5 {
                0 => b"the quick brown fox ",
                1 => b"jumps over ",
                2 => b"the lazy dog. ",
                3 => b"the quick brown dog ",
                _ => b"sleeps. ",
            };
            input.extend_from_slice(phrase);
            input.extend_from_slice(&(i / 7).to_le_bytes());
        }
        input
    }

    #[test]
    fn never_larger_than_any_limited_parse() {
        let input = wobbly_input();

        let mut optimal = Vec::new();
        OptimalParser::new().compress(&input, &mut optimal);

        for params in [
            SearchParams {
                max_depth: 1,
                accept_len: 18,
            },
            SearchParams {
                max_depth: 64,
                accept_len: 64,
            },
            SearchParams {
                max_depth: 4096,
                accept_len: 256,
            },
        ] {
            let mut tree = Vec::new();
            TreeParser::new().compress(&input, &mut tree, params);
            assert!(optimal.len() <= tree.len());

            let mut chain = Vec::new();
            ChainParser::new().compress(&input, &mut chain, params);
            assert!(optimal.len() <= chain.len());
        }

        assert_eq!(decompress(&optimal).unwrap(), input);
    }

    #[test]
    fn handles_pathological_runs() {
        // Every position in a run hashes to the same bucket; the re-rooted
        // trees must still terminate and parse it well.
        let mut input = vec![0u8; 4000];
        input.extend_from_slice(b"tail marker tail marker");
        let mut out = Vec::new();
        OptimalParser::new().compress(&input, &mut out);
        assert!(out.len() < 64);
        assert_eq!(decompress(&out).unwrap(), input);
    }
}
