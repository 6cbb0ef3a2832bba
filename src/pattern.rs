//! Ordered, duplicate-free symbol patterns and the pattern-file reader

use crate::error::{Result, SigError};
use std::collections::HashSet;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

/// Ordered list of distinct symbols whose in-order occurrence is tested
///
/// # Example
/// ```
/// use seqsig::pattern::Pattern;
///
/// let pattern: Pattern = "open read close".parse().unwrap();
/// assert_eq!(pattern.len(), 3);
/// assert_eq!(pattern.to_string(), "open read close");
/// assert!("a b a".parse::<Pattern>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    symbols: Vec<String>,
}

impl Pattern {
    /// Build a pattern, rejecting empty and duplicate-containing symbol lists
    pub fn new(symbols: Vec<String>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(SigError::EmptyPattern);
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        if !symbols.iter().all(|s| seen.insert(s.as_str())) {
            return Err(SigError::DuplicateSymbol {
                pattern: symbols.join(" "),
            });
        }

        Ok(Self { symbols })
    }

    /// Symbols in required order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; construction rejects empty patterns
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromStr for Pattern {
    type Err = SigError;

    fn from_str(line: &str) -> Result<Self> {
        Self::new(line.split_whitespace().map(str::to_string).collect())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbols.join(" "))
    }
}

/// Lazily reads one pattern per non-blank line
pub struct PatternReader<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> PatternReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for PatternReader<R> {
    type Item = Result<Pattern>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) if self.line.trim().is_empty() => continue,
                Ok(_) => return Some(self.line.parse()),
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
