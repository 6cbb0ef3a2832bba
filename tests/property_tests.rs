//! Property-based tests for the exact arithmetic and the estimators
//!
//! Core properties covered:
//! 1. Prime factorization reproduces its input
//! 2. Binomial cache symmetry and agreement with direct computation
//! 3. Occurrence probabilities are probabilities and ignore count order
//! 4. Exact and normal p-values never increase with support

use proptest::prelude::*;
use seqsig::combinatorics::{BinomialCache, OccurrenceEngine};
use seqsig::exact::ExactInteger;
use seqsig::significance::{normal_upper_tail, poisson_binomial_upper_tail};

fn product_u128(value: &ExactInteger) -> u128 {
    value
        .factors()
        .map(|(p, e)| {
            assert!(e > 0, "integer input must have positive exponents");
            (p as u128).pow(e as u32)
        })
        .product()
}

fn binomial_u128(b: u64, e: u64) -> u128 {
    let mut acc = 1u128;
    for i in 1..=e as u128 {
        acc = acc * (b as u128 + i) / i;
    }
    acc
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_factorization_round_trip(n in 1u64..5_000_000) {
        let value = ExactInteger::new(n).unwrap();
        prop_assert_eq!(product_u128(&value), n as u128);
    }

    #[test]
    fn prop_multiply_then_divide_is_identity(a in 1u64..100_000, b in 1u64..100_000) {
        let mut value = ExactInteger::new(a).unwrap();
        let other = ExactInteger::new(b).unwrap();
        value *= &other;
        value /= &other;
        prop_assert_eq!(value, ExactInteger::new(a).unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_binomial_symmetric(b in 0u64..40, e in 0u64..40) {
        let mut cache = BinomialCache::new();
        prop_assert_eq!(cache.get(b, e), cache.get(e, b));
    }

    #[test]
    fn prop_binomial_matches_direct(b in 0u64..30, e in 0u64..30) {
        let mut cache = BinomialCache::new();
        let value = cache.get(b, e);
        prop_assert_eq!(product_u128(&value), binomial_u128(b, e));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_occurrence_is_probability(counts in prop::collection::vec(1u64..6, 1..5)) {
        let mut engine = OccurrenceEngine::new();
        let p = engine.probability(&counts);
        prop_assert!(p > 0.0);
        prop_assert!(p <= 1.0 + 1e-12);
    }

    #[test]
    fn prop_occurrence_ignores_count_order(counts in prop::collection::vec(1u64..6, 2..5)) {
        let mut engine = OccurrenceEngine::new();
        let forward = engine.probability(&counts);
        let mut reversed = counts.clone();
        reversed.reverse();
        let mut fresh = OccurrenceEngine::new();
        let backward = fresh.probability(&reversed);
        prop_assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn prop_more_copies_never_lower_probability(
        counts in prop::collection::vec(1u64..5, 2..4),
        slot in 0usize..4,
    ) {
        let mut engine = OccurrenceEngine::new();
        let base = engine.probability(&counts);
        let mut bumped = counts.clone();
        let slot = slot % bumped.len();
        bumped[slot] += 1;
        let more = engine.probability(&bumped);
        prop_assert!(more + 1e-12 >= base);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_exact_tail_monotone(
        probabilities in prop::collection::vec(0.0f64..=1.0, 1..30),
        support in 0u64..30,
    ) {
        let here = poisson_binomial_upper_tail(&probabilities, support).unwrap();
        let next = poisson_binomial_upper_tail(&probabilities, support + 1).unwrap();
        prop_assert!(next <= here + 1e-12);
        prop_assert!(here >= -1e-12 && here <= 1.0 + 1e-12);
    }

    #[test]
    fn prop_exact_tail_at_zero_is_one(probabilities in prop::collection::vec(0.0f64..=1.0, 1..30)) {
        let p = poisson_binomial_upper_tail(&probabilities, 0).unwrap();
        prop_assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_normal_tail_monotone(
        support in 0u64..100,
        expected in 0.0f64..100.0,
        sd in 0.1f64..20.0,
    ) {
        let here = normal_upper_tail(support, expected, sd);
        let next = normal_upper_tail(support + 1, expected, sd);
        prop_assert!(next <= here);
        prop_assert!((0.0..=1.0).contains(&here));
    }
}
