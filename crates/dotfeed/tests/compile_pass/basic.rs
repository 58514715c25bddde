//! Tagged leaf fields with key shorthand and doc comments.

use dotfeed::Record;

#[derive(Record, Default)]
struct Config {
    /// Public name of the service
    #[dotenv(key = "APP_NAME")]
    name: String,

    #[dotenv("APP_PORT")]
    port: u16,

    #[dotenv("APP_DEBUG")]
    debug: Option<bool>,

    #[dotenv("APP_TAGS")]
    tags: Vec<String>,
}

fn main() {
    let mut config = Config::default();
    let report = dotfeed::decode_str("APP_NAME=demo\nAPP_PORT=80\n", &mut config).unwrap();

    assert_eq!(config.name, "demo");
    assert_eq!(config.port, 80);
    assert!(config.debug.is_none());
    assert!(config.tags.is_empty());
    assert_eq!(report.assigned.len(), 2);
}
