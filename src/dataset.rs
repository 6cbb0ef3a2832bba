//! Token sources: the dataset side of a processing pass
//!
//! A pass walks the dataset token by token; a [`Token::SequenceEnd`] marker
//! closes every sequence. Sources can be rewound for another pass and can
//! shuffle the tokens inside each sequence (boundaries are never moved),
//! which is how resampling passes destroy ordering while keeping counts.

use crate::error::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::BufRead;

/// One element of a token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Symbol(&'a str),
    SequenceEnd,
}

/// Rewindable stream of tokens with optional within-sequence shuffling
pub trait TokenSource {
    /// Rewind to the first token of the first sequence
    fn reset(&mut self);

    /// Shuffle tokens within each sequence from now on, using a generator
    /// seeded with `seed`; `None` restores the original order
    fn set_shuffle(&mut self, seed: Option<u64>);

    /// Next token, or `None` once the dataset is exhausted
    fn next_token(&mut self) -> Option<Token<'_>>;
}

/// Histogram of sequence lengths observed during a full pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetShape {
    lengths: BTreeMap<usize, u64>,
}

impl DatasetShape {
    /// Count one sequence of `length` tokens
    pub fn record(&mut self, length: usize) {
        *self.lengths.entry(length).or_insert(0) += 1;
    }

    /// Number of sequences recorded
    pub fn sequences(&self) -> u64 {
        self.lengths.values().sum()
    }

    /// Total number of tokens across all sequences
    pub fn total_tokens(&self) -> u64 {
        self.lengths
            .iter()
            .map(|(&len, &count)| len as u64 * count)
            .sum()
    }

    /// Longest sequence length (0 when empty)
    pub fn max_length(&self) -> usize {
        self.lengths.keys().next_back().copied().unwrap_or(0)
    }

    /// `(length, count)` pairs in ascending length order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.lengths.iter().map(|(&l, &c)| (l, c))
    }

    pub fn clear(&mut self) {
        self.lengths.clear();
    }
}

/// In-memory dataset: one sequence per non-blank line, whitespace-separated
///
/// # Example
/// ```
/// use seqsig::dataset::{Dataset, Token, TokenSource};
///
/// let mut data = Dataset::from_reader("a b\nc\n".as_bytes()).unwrap();
/// assert_eq!(data.next_token(), Some(Token::Symbol("a")));
/// assert_eq!(data.next_token(), Some(Token::Symbol("b")));
/// assert_eq!(data.next_token(), Some(Token::SequenceEnd));
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    sequences: Vec<Vec<String>>,
    sequence: usize,
    token: usize,
    order: Vec<usize>,
    rng: Option<StdRng>,
}

impl Dataset {
    pub fn new(sequences: Vec<Vec<String>>) -> Self {
        let mut dataset = Self {
            sequences,
            sequence: 0,
            token: 0,
            order: Vec::new(),
            rng: None,
        };
        dataset.reset();
        dataset
    }

    /// Parse a dataset; blank lines are skipped
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut sequences = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            if !tokens.is_empty() {
                sequences.push(tokens);
            }
        }
        Ok(Self::new(sequences))
    }

    pub fn sequences(&self) -> &[Vec<String>] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Prepare the visiting order for the current sequence
    fn load_order(&mut self) {
        self.order.clear();
        if let Some(seq) = self.sequences.get(self.sequence) {
            self.order.extend(0..seq.len());
            if let Some(rng) = self.rng.as_mut() {
                self.order.shuffle(rng);
            }
        }
    }
}

impl TokenSource for Dataset {
    fn reset(&mut self) {
        self.sequence = 0;
        self.token = 0;
        self.load_order();
    }

    fn set_shuffle(&mut self, seed: Option<u64>) {
        self.rng = seed.map(StdRng::seed_from_u64);
    }

    fn next_token(&mut self) -> Option<Token<'_>> {
        if self.sequence >= self.sequences.len() {
            return None;
        }

        if self.token < self.order.len() {
            let idx = self.order[self.token];
            self.token += 1;
            return Some(Token::Symbol(&self.sequences[self.sequence][idx]));
        }

        self.sequence += 1;
        self.token = 0;
        self.load_order();
        Some(Token::SequenceEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(source: &mut impl TokenSource) -> Vec<Vec<String>> {
        let mut out = vec![Vec::new()];
        while let Some(token) = source.next_token() {
            match token {
                Token::Symbol(s) => out.last_mut().unwrap().push(s.to_string()),
                Token::SequenceEnd => out.push(Vec::new()),
            }
        }
        out.pop();
        out
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let data = Dataset::from_reader("A B\n\nB  A\n   \nA B\n".as_bytes()).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.sequences()[1], vec!["B", "A"]);
    }

    #[test]
    fn test_stream_emits_boundaries() {
        let mut data = Dataset::from_reader("A B\nC\n".as_bytes()).unwrap();
        assert_eq!(drain(&mut data), vec![vec!["A", "B"], vec!["C"]]);
        assert_eq!(data.next_token(), None);
    }

    #[test]
    fn test_reset_replays() {
        let mut data = Dataset::from_reader("A B\nC\n".as_bytes()).unwrap();
        let first = drain(&mut data);
        data.reset();
        assert_eq!(drain(&mut data), first);
    }

    #[test]
    fn test_shuffle_preserves_boundaries_and_counts() {
        let text = "a b c d e f g h\ni j\nk\n";
        let mut data = Dataset::from_reader(text.as_bytes()).unwrap();
        let original = drain(&mut data);

        data.set_shuffle(Some(7));
        data.reset();
        let shuffled = drain(&mut data);

        assert_eq!(shuffled.len(), original.len());
        for (a, b) in original.iter().zip(&shuffled) {
            let mut a = a.clone();
            let mut b = b.clone();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_shuffle_is_reproducible_per_seed() {
        let text = "a b c d e f g h i j k l\n";
        let mut data = Dataset::from_reader(text.as_bytes()).unwrap();
        data.set_shuffle(Some(42));
        data.reset();
        let first = drain(&mut data);
        data.set_shuffle(Some(42));
        data.reset();
        assert_eq!(drain(&mut data), first);
    }

    #[test]
    fn test_shuffle_off_restores_order() {
        let mut data = Dataset::from_reader("a b c d e f\n".as_bytes()).unwrap();
        data.set_shuffle(Some(1));
        data.reset();
        drain(&mut data);
        data.set_shuffle(None);
        data.reset();
        assert_eq!(drain(&mut data), vec![vec!["a", "b", "c", "d", "e", "f"]]);
    }

    #[test]
    fn test_dataset_shape() {
        let mut shape = DatasetShape::default();
        shape.record(3);
        shape.record(3);
        shape.record(5);
        assert_eq!(shape.sequences(), 3);
        assert_eq!(shape.total_tokens(), 11);
        assert_eq!(shape.max_length(), 5);
        assert_eq!(shape.iter().collect::<Vec<_>>(), vec![(3, 2), (5, 1)]);
        shape.clear();
        assert_eq!(shape.max_length(), 0);
    }
}
