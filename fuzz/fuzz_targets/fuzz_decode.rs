#![no_main]

use std::error::Error as _;

use arbitrary::Arbitrary;
use dotfeed::{Error, Record};
use libfuzzer_sys::fuzz_target;

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Inner {
    #[dotenv("PORT")]
    port: u16,
    #[dotenv("RATIO")]
    ratio: Option<f64>,
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Config {
    #[dotenv("NAME")]
    name: String,
    #[dotenv("FLAG")]
    flag: bool,
    #[dotenv("TAGS")]
    tags: Vec<i32>,
    #[dotenv(key = "PIN", secret)]
    pin: bool,
    inner: Inner,
}

/// A document assembled from fuzzed values for the known keys.
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    name: Option<String>,
    flag: Option<String>,
    tags: Option<String>,
    pin: Option<String>,
    port: Option<String>,
    ratio: Option<String>,
}

fuzz_target!(|input: FuzzInput| {
    let pairs = [
        ("NAME", input.name),
        ("FLAG", input.flag),
        ("TAGS", input.tags),
        ("PIN", input.pin),
        ("PORT", input.port),
        ("RATIO", input.ratio),
    ];

    let document: String = pairs
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}\n")))
        .collect();

    let mut config = Config::default();
    let before = config.clone();

    match dotfeed::decode_str(&document, &mut config) {
        Ok(report) => {
            let _ = report.to_string();
        }
        Err(Error::Syntax { .. }) => {
            assert_eq!(config, before, "syntax errors must not touch the target");
        }
        Err(err @ Error::Field { secret: true, .. }) => {
            let source = err.source().map(ToString::to_string).unwrap_or_default();
            assert!(source.ends_with("<redacted>"), "secret leaked: {source}");
            assert!(err.to_string().ends_with("<redacted>"));
        }
        Err(_) => {}
    }
});
