#![no_main]

use dotfeed::{Error, parse_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match parse_bytes(data) {
        Ok(entries) => {
            for entry in entries.iter() {
                assert!(!entry.key.is_empty(), "parsed an empty key");
                assert!(
                    !entry.key.chars().any(char::is_whitespace),
                    "parsed key {:?} contains whitespace",
                    entry.key
                );
                assert!(entry.line >= 1, "line numbers are 1-based");
            }
        }
        Err(Error::Syntax { source }) => {
            // Rendering must not panic for any span the parser produces.
            let _ = format!("{source}");
            let _ = format!("{:?}", dotfeed::miette::Report::new(source));
        }
        Err(_) => {}
    }
});
