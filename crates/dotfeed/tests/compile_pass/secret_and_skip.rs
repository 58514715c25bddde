//! Secret fields and skipped fields of types the mapper cannot feed.

use std::time::Instant;

use dotfeed::Record;

#[derive(Record)]
struct Config {
    #[dotenv(key = "API_TOKEN", secret)]
    token: String,

    #[dotenv(skip)]
    started_at: Instant,
}

fn main() {
    let mut config = Config {
        token: String::new(),
        started_at: Instant::now(),
    };
    dotfeed::decode_str("API_TOKEN=hunter2\n", &mut config).unwrap();

    assert_eq!(config.token, "hunter2");
    let _ = config.started_at;
}
