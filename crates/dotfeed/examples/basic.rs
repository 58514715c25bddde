//! Example: decode a dotenv document into a struct
//!
//! Run with:
//!   `cargo run --package dotfeed --example basic`

use dotfeed::Record;

#[derive(Record, Debug)]
struct Config {
    #[dotenv("DATABASE_URL")]
    db_url: String,

    #[dotenv("PORT")]
    port: u16,

    #[dotenv("DEBUG")]
    debug: bool,

    #[dotenv("API_KEY")]
    api_key: Option<String>,

    #[dotenv("ALLOWED_HOSTS")]
    allowed_hosts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_url: String::new(),
            port: 8080,
            debug: false,
            api_key: None,
            allowed_hosts: Vec::new(),
        }
    }
}

const DOCUMENT: &str = r#"
# Service settings
export DATABASE_URL=postgres://localhost/app
DEBUG=true          # inline comments are dropped
ALLOWED_HOSTS="localhost, example.com"
"#;

fn main() -> dotfeed::Result<()> {
    let mut config = Config::default();
    let report = dotfeed::decode_str(DOCUMENT, &mut config)?;

    println!("Successfully loaded config!");
    println!("  DATABASE_URL  = {}", config.db_url);
    println!("  PORT          = {} (kept default)", config.port);
    println!("  DEBUG         = {}", config.debug);
    println!("  API_KEY       = {:?}", config.api_key);
    println!("  ALLOWED_HOSTS = {:?}", config.allowed_hosts);
    println!();
    println!("{report}");

    Ok(())
}
