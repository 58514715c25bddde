//! Example: JSON-valued fields
//!
//! Run with:
//!   `cargo run --package dotfeed --example json_values --features serde`

use std::collections::BTreeMap;

use dotfeed::{Json, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
struct Retry {
    attempts: u32,
    backoff_ms: u64,
}

#[derive(Record, Debug, Default)]
struct Config {
    /// Per-route rate limits
    #[dotenv("RATE_LIMITS")]
    rate_limits: Json<BTreeMap<String, u32>>,

    #[dotenv("RETRY")]
    retry: Json<Retry>,
}

const DOCUMENT: &str = r#"
RATE_LIMITS='{"read": 100, "write": 10}'
RETRY={"attempts": 3, "backoff_ms": 250}
"#;

fn main() -> dotfeed::Result<()> {
    let mut config = Config::default();
    dotfeed::decode_str(DOCUMENT, &mut config)?;

    for (route, limit) in &config.rate_limits.0 {
        println!("{route}: {limit} req/s");
    }
    println!("retry: {:?}", config.retry.0);

    print!("{}", dotfeed::example::render(&mut config)?);

    Ok(())
}
