//! Untagged record fields, directly and behind pointers.

use dotfeed::Record;

#[derive(Record, Default)]
struct Database {
    #[dotenv("DB_URL")]
    url: String,
}

#[derive(Record, Default)]
struct Cache {
    #[dotenv("CACHE_TTL")]
    ttl: u32,
}

#[derive(Record, Default)]
struct Config {
    database: Database,
    cache: Option<Box<Cache>>,
    retries: u8,
}

fn main() {
    let mut config = Config {
        cache: Some(Box::default()),
        ..Config::default()
    };
    dotfeed::decode_str("DB_URL=postgres://db\nCACHE_TTL=30\n", &mut config).unwrap();

    assert_eq!(config.database.url, "postgres://db");
    assert_eq!(config.cache.map(|c| c.ttl), Some(30));
    assert_eq!(config.retries, 0);
}
