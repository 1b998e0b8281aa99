//! Fuzz target for LIKE escaping.
//!
//! Any term, once escaped and wrapped, must match every value that
//! contains it and must match itself.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_pattern_escape
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use searchable_query::pattern::{contains_pattern, like_match};

#[derive(Debug, Arbitrary)]
struct Input {
    term: String,
    prefix: String,
    suffix: String,
    escape: char,
}

fuzz_target!(|input: Input| {
    if input.escape == '%' || input.escape == '_' {
        return;
    }

    let pattern = contains_pattern(&input.term, input.escape);
    let haystack = format!("{}{}{}", input.prefix, input.term, input.suffix);

    assert!(like_match(&input.term, &pattern, input.escape, false));
    assert!(like_match(&haystack, &pattern, input.escape, false));
    // Case folding must not disturb escapes, even for a letter escape.
    assert!(like_match(&haystack, &pattern, input.escape, true));
});
