// crates/locality-core/src/similarity.rs

//! Longest-matching-block similarity ratio.
//!
//! `ratio = 2 * M / T` where `M` is the total size of the matching blocks
//! found by recursively taking the longest common contiguous block and
//! recursing on both sides of it, and `T` is the combined length of both
//! strings. Strings are compared as lowercase `char` sequences.

use std::collections::HashMap;

/// `b` lengths from which very frequent characters stop seeding matches.
const POPULAR_MIN_LEN: usize = 200;

/// A matching block: `a[a_start..a_start + size] == b[b_start..b_start + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Case-insensitive similarity of `a` and `b` in `[0, 1]`.
///
/// ```rust
/// use locality_core::similarity::similarity;
///
/// assert_eq!(similarity("Rome", "rome"), 1.0);
/// assert_eq!(similarity("", ""), 1.0);
/// assert_eq!(similarity("abc", ""), 0.0);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}

/// Matcher over two character sequences.
///
/// Builds a position index of `b` once, so [`SequenceMatcher::ratio`] and
/// [`SequenceMatcher::matching_blocks`] share the same lookup table.
pub struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Ascending positions of every character in `b`, popular ones excluded.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    pub fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // Long `b` sequences: characters making up more than 1% of `b` are
        // too common to be useful match seeds.
        let n = b.len();
        if n >= POPULAR_MIN_LEN {
            let limit = n / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` × `b[blo..bhi]`.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// the one starting earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending at a[i - 1], b[j].
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters never seed a match, but may extend one.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        Block {
            a_start: besti,
            b_start: bestj,
            size: bestsize,
        }
    }

    /// All matching blocks in ascending order, adjacent blocks merged.
    pub fn matching_blocks(&self) -> Vec<Block> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort_by_key(|b| (b.a_start, b.b_start));

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged
    }

    /// `2 * M / T`; two empty sequences are identical.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|b| b.size).sum();
        2.0 * matched as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn identity_and_empty() {
        assert_eq!(similarity("Smith", "Smith"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
    }

    #[test]
    fn comparison_ignores_case() {
        assert_eq!(similarity("SMITH", "smith"), 1.0);
    }

    #[test]
    fn known_ratios() {
        // "sm" + "th" of 5 + 6 chars.
        assert!((similarity("Smith", "Smythe") - 8.0 / 11.0).abs() < 1e-12);
        // "abcd" + "bcde": "bcd" matched.
        assert!((similarity("abcd", "bcde") - 0.75).abs() < 1e-12);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn longest_match_prefers_earliest_block() {
        let (a, b) = (chars("abxab"), chars("ab"));
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(
            m.find_longest_match(0, a.len(), 0, b.len()),
            Block { a_start: 0, b_start: 0, size: 2 }
        );
    }

    #[test]
    fn matching_blocks_recurse_on_both_sides() {
        let (a, b) = (chars("qabxcd"), chars("abycdf"));
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(
            m.matching_blocks(),
            vec![
                Block { a_start: 1, b_start: 0, size: 2 },
                Block { a_start: 4, b_start: 3, size: 2 },
            ]
        );
        assert!((m.ratio() - 8.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn popular_characters_do_not_seed_long_matches() {
        // Every char of `b` is popular: no seeds, and "z" blocks extension.
        let a = chars("zx");
        let b: Vec<char> = "x".repeat(POPULAR_MIN_LEN).chars().collect();
        let m = SequenceMatcher::new(&a, &b);
        assert_eq!(m.ratio(), 0.0);
    }

    proptest! {
        #[test]
        fn ratio_is_bounded(a in "\\PC{0,24}", b in "\\PC{0,24}") {
            let r = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&r));
        }

        #[test]
        fn identical_strings_score_one(s in "[a-zA-Z ]{1,40}") {
            prop_assert_eq!(similarity(&s, &s), 1.0);
        }
    }
}
