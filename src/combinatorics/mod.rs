// Exact combinatorics for subsequence occurrence probabilities
//
// The occurrence probability of an ordered pattern inside one sequence only
// depends on how many tokens of each pattern symbol the sequence holds. The
// engine below interleaves the symbols one at a time and weights every
// interleaving by ratios of binomial coefficients, which are kept exact in
// prime-factorized form until the final division.
//
// Both memo tables live inside an explicitly constructed engine instance and
// are shared by handing the same `&mut OccurrenceEngine` to every tracker.

mod binomial;
mod occurrence;

pub use binomial::BinomialCache;
pub use occurrence::OccurrenceEngine;
