#![no_main]

//! Fuzz target for svn log parsing
//!
//! Arbitrary text must never make the parser panic, and every emitted
//! record must keep the non-empty revision/author invariant.

use libfuzzer_sys::fuzz_target;
use svnscope_svn::{CommitRecord, parse_log};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let filter = text.lines().next().filter(|l| l.len() < 8);
    for record in parse_log(text, filter) {
        assert!(CommitRecord::is_valid_revision(&record.revision));
        assert!(!record.author.is_empty());
    }
});
