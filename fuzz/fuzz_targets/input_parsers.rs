#![no_main]

use libfuzzer_sys::fuzz_target;
use seqsig::pattern::PatternReader;
use seqsig::{Analyzer, Dataset};

fuzz_target!(|data: &[u8]| {
    // Same bytes serve as pattern file and data file; neither may panic
    let patterns: Vec<_> = PatternReader::new(data).filter_map(Result::ok).take(8).collect();
    if let Ok(mut dataset) = Dataset::from_reader(data) {
        if dataset.sequences().iter().all(|s| s.len() <= 64) {
            let mut analyzer = Analyzer::new(patterns);
            analyzer.process(&mut dataset);
            let _ = analyzer.reports();
        }
    }
});
