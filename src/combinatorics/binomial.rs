use crate::exact::ExactInteger;
use fnv::FnvHashMap;
use std::num::NonZeroU64;

/// Memoized binomial coefficients `G(b, e) = (b + e)! / (b! e!)`
///
/// Keys are normalized so that `b >= e`. Entries are never evicted; the table
/// is bounded by the distinct `(b, e)` pairs the engine asks for.
#[derive(Debug, Default, Clone)]
pub struct BinomialCache {
    table: FnvHashMap<(u64, u64), ExactInteger>,
}

impl BinomialCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact value of `choose(b + e, e)`
    ///
    /// Computed as `(b+1)(b+2)..(b+e) / 2*3*..*e` on one exact value, so no
    /// factorial is ever materialized.
    pub fn get(&mut self, b: u64, e: u64) -> ExactInteger {
        let (b, e) = if b < e { (e, b) } else { (b, e) };

        self.table
            .entry((b, e))
            .or_insert_with(|| {
                let mut f = ExactInteger::one();
                for i in (b + 1..=b + e).filter_map(NonZeroU64::new) {
                    f *= i;
                }
                for i in (2..=e).filter_map(NonZeroU64::new) {
                    f /= i;
                }
                f
            })
            .clone()
    }

    /// Number of memoized entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when nothing has been memoized yet
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
