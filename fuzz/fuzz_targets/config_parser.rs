//! Fuzz target for the `searchable.toml` parser.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use searchable_query::SearchConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // The parser should never panic, only return errors
        if let Ok(config) = SearchConfig::from_str(input) {
            let escape = config.search.escape_char;
            assert!(escape != '%' && escape != '_' && !escape.is_whitespace());
        }
    }
});
