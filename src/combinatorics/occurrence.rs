use super::BinomialCache;
use fnv::FnvHashMap;

/// Exact probability that an ordered pattern occurs as a subsequence
///
/// Given the per-symbol token counts of one finished sequence, returns the
/// probability that a uniformly random ordering of those tokens contains the
/// pattern symbols in pattern order. The answer only depends on the multiset
/// of counts, so results are memoized on the sorted count vector.
#[derive(Debug, Default, Clone)]
pub struct OccurrenceEngine {
    binomials: BinomialCache,
    memo: FnvHashMap<Vec<u64>, f64>,
}

impl OccurrenceEngine {
    /// Create an engine with empty memo tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Occurrence probability for the given per-symbol counts
    ///
    /// Any zero count means the pattern cannot occur and yields `0.0`.
    /// A single-symbol pattern always occurs once its symbol is present.
    pub fn probability(&mut self, counts: &[u64]) -> f64 {
        let mut key = counts.to_vec();
        key.sort_unstable();

        if key.first() == Some(&0) {
            return 0.0;
        }
        if key.len() <= 1 {
            return 1.0;
        }
        if let Some(&cached) = self.memo.get(&key) {
            return cached;
        }

        let result = self.interleave(&key);
        tracing::trace!(counts = ?key, probability = result, "occurrence probability computed");
        self.memo.insert(key, result);
        result
    }

    /// Dynamic program over insertion positions
    ///
    /// `prev[j]` holds the probability mass of the partial ordering whose
    /// matched prefix ends at position `j`. Each step inserts the `x` tokens
    /// of the next symbol into the `l` tokens already placed.
    fn interleave(&mut self, counts: &[u64]) -> f64 {
        let total: u64 = counts.iter().sum();
        let size = total as usize;
        let mut prev = vec![0.0f64; size];
        let mut next = vec![0.0f64; size];
        prev[0] = 1.0;

        let mut l = 0u64;
        for n in 1..counts.len() {
            l += counts[n - 1];
            let x = counts[n];
            let norm_term = self.binomials.get(l, x);

            next.fill(0.0);
            for j in 0..l {
                let mass = prev[j as usize];
                if mass == 0.0 {
                    continue;
                }
                for p in j + 1..=l {
                    for t in 0..x {
                        let mut weight = self.binomials.get(j, t);
                        weight *= &self.binomials.get(l - p, x - t - 1);
                        weight /= &norm_term;
                        next[(p + t) as usize] += mass * weight.to_f64();
                    }
                }
            }
            std::mem::swap(&mut prev, &mut next);
        }

        prev.iter().sum()
    }

    /// Number of memoized count vectors
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Number of memoized binomial coefficients
    pub fn binomial_len(&self) -> usize {
        self.binomials.len()
    }
}
