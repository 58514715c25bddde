//! Example: diagnostics for malformed documents and bad values
//!
//! Each failure is rendered through miette's graphical handler, with the
//! offending line highlighted.
//!
//! Run with:
//!   `cargo run --package dotfeed --example error_demo`

use dotfeed::Record;
use dotfeed::miette::Report;

#[derive(Record, Debug, Default)]
struct Config {
    #[dotenv("PORT")]
    port: u16,

    #[dotenv(key = "API_TOKEN", secret)]
    token: u32,
}

fn show(title: &str, document: &str) {
    println!("=== {title} ===");
    let mut config = Config::default();
    match dotfeed::decode_str(document, &mut config) {
        Ok(report) => println!("{report}"),
        Err(err) => println!("{:?}", Report::new(err)),
    }
    println!();
}

fn main() {
    show("Missing separator", "PORT=8080\nAPI_TOKEN\n");
    show("Value without a key", "PORT=8080\n=42\n");
    show("Unterminated quote", "PORT=\"8080\nAPI_TOKEN=1\n");
    show("Wrong type", "PORT=http\n");
    show("Secret value is redacted", "API_TOKEN=hunter2\n");
    show("Valid", "PORT=8080\nAPI_TOKEN=42\n");
}
