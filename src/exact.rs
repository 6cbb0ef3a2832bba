//! Exact positive rationals stored as prime-factorization exponents
//!
//! Binomial ratios in the occurrence-probability engine involve factorials far
//! beyond `f64` range. Keeping every intermediate value as a map
//! `prime -> exponent` makes multiplication and division exact (exponent
//! addition and subtraction), and only the final, normalized ratio is
//! converted to floating point.
//!
//! # Example
//!
//! ```
//! use seqsig::exact::ExactInteger;
//!
//! let mut v = ExactInteger::new(12).unwrap();
//! v /= &ExactInteger::new(8).unwrap();
//! assert_eq!(v.to_f64(), 1.5);
//! ```

use crate::error::{Result, SigError};
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU64;
use std::ops::{DivAssign, MulAssign};

/// Wheel increments for candidate divisors coprime to 2, 3 and 5, starting at 7
const WHEEL: [u64; 8] = [4, 2, 4, 2, 4, 6, 2, 6];

/// Positive rational value kept as `prime -> exponent`
///
/// Zero exponents are never stored, so two values are equal exactly when
/// their factorizations are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactInteger {
    factors: BTreeMap<u64, i64>,
}

impl ExactInteger {
    /// The multiplicative identity
    pub fn one() -> Self {
        Self::default()
    }

    /// Factorize a positive integer
    ///
    /// Fails with [`SigError::InvalidFactorizationInput`] for `n == 0`.
    pub fn new(n: u64) -> Result<Self> {
        NonZeroU64::new(n)
            .map(Self::from)
            .ok_or(SigError::InvalidFactorizationInput(n))
    }

    /// Iterate `(prime, exponent)` pairs in ascending prime order
    pub fn factors(&self) -> impl Iterator<Item = (u64, i64)> + '_ {
        self.factors.iter().map(|(&p, &e)| (p, e))
    }

    /// Exponent of `prime` (zero when absent)
    pub fn exponent(&self, prime: u64) -> i64 {
        self.factors.get(&prime).copied().unwrap_or(0)
    }

    /// True when the value equals one
    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }

    /// Lossy conversion to `f64`
    ///
    /// Overflows to infinity when the net magnitude is outside `f64` range;
    /// callers divide by a normalization term of the same order first.
    pub fn to_f64(&self) -> f64 {
        self.factors.iter().fold(1.0, |acc, (&prime, &exp)| {
            let base = prime as f64;
            let term = match i32::try_from(exp) {
                Ok(e) => base.powi(e),
                Err(_) => base.powf(exp as f64),
            };
            acc * term
        })
    }

    fn add_exponent(&mut self, prime: u64, delta: i64) {
        let exp = self.factors.entry(prime).or_insert(0);
        *exp += delta;
        if *exp == 0 {
            self.factors.remove(&prime);
        }
    }
}

/// Trial division: strip 2, 3 and 5, then walk the mod-30 wheel up to sqrt(n)
fn prime_factorize(n: NonZeroU64) -> BTreeMap<u64, i64> {
    let mut n = n.get();
    let mut result = BTreeMap::new();

    for small in [2u64, 3, 5] {
        while n % small == 0 {
            *result.entry(small).or_insert(0) += 1;
            n /= small;
        }
    }

    let mut f = 7u64;
    let mut step = 0usize;
    while f <= n / f {
        if n % f == 0 {
            *result.entry(f).or_insert(0) += 1;
            n /= f;
        } else {
            f += WHEEL[step % WHEEL.len()];
            step += 1;
        }
    }

    if n != 1 {
        *result.entry(n).or_insert(0) += 1;
    }

    result
}

impl From<NonZeroU64> for ExactInteger {
    fn from(n: NonZeroU64) -> Self {
        Self {
            factors: prime_factorize(n),
        }
    }
}

impl MulAssign<&ExactInteger> for ExactInteger {
    fn mul_assign(&mut self, rhs: &ExactInteger) {
        for (&prime, &exp) in &rhs.factors {
            self.add_exponent(prime, exp);
        }
    }
}

impl DivAssign<&ExactInteger> for ExactInteger {
    fn div_assign(&mut self, rhs: &ExactInteger) {
        for (&prime, &exp) in &rhs.factors {
            self.add_exponent(prime, -exp);
        }
    }
}

impl MulAssign<NonZeroU64> for ExactInteger {
    fn mul_assign(&mut self, rhs: NonZeroU64) {
        *self *= &ExactInteger::from(rhs);
    }
}

impl DivAssign<NonZeroU64> for ExactInteger {
    fn div_assign(&mut self, rhs: NonZeroU64) {
        *self /= &ExactInteger::from(rhs);
    }
}

impl fmt::Display for ExactInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .factors
            .iter()
            .map(|(p, e)| {
                if *e == 1 {
                    p.to_string()
                } else {
                    format!("{}^{}", p, e)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" * "))
    }
}
