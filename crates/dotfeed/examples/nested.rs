//! Example: nested records, optional sections and key prefixes
//!
//! Run with:
//!   `cargo run --package dotfeed --example nested`

use std::sync::Arc;

use dotfeed::{Decoder, Record};
use parking_lot::Mutex;

#[derive(Record, Debug, Default)]
struct Database {
    /// Connection string
    #[dotenv("DB_URL")]
    url: String,

    /// Pool size
    #[dotenv("DB_POOL")]
    pool: u32,
}

#[derive(Record, Debug, Default)]
struct Tls {
    #[dotenv("TLS_CERT")]
    cert: String,
}

#[derive(Record, Debug, Default)]
struct Server {
    #[dotenv("NAME")]
    name: String,

    database: Database,

    /// Only fed when the section is present.
    tls: Option<Box<Tls>>,

    /// Shared with other parts of the program.
    limits: Arc<Mutex<Limits>>,
}

#[derive(Record, Debug, Default)]
struct Limits {
    #[dotenv("MAX_REQUESTS")]
    max_requests: u64,
}

const DOCUMENT: &str = "\
APP_NAME=demo
APP_DB_URL=postgres://db/app
APP_DB_POOL=16
APP_TLS_CERT=/etc/tls/cert.pem
APP_MAX_REQUESTS=500
";

fn main() -> dotfeed::Result<()> {
    let mut server = Server {
        tls: Some(Box::default()),
        ..Server::default()
    };
    let limits = Arc::clone(&server.limits);

    let report = Decoder::new(DOCUMENT.as_bytes())
        .named("demo.env")
        .with_prefix("APP_")
        .decode(&mut server)?;

    println!("{server:#?}");
    println!("limits seen elsewhere: {}", limits.lock().max_requests);
    println!();
    println!("{report}");

    Ok(())
}
