//! Example: generate a .env.example file from a struct
//!
//! Run with:
//!   `cargo run --package dotfeed --example env_example_gen`
//!
//! To save to a file:
//!   `cargo run --package dotfeed --example env_example_gen > .env.example`

use dotfeed::Record;

/// Database configuration
#[derive(Record)]
struct DatabaseConfig {
    /// Database connection URL
    #[dotenv("DATABASE_URL")]
    url: String,

    /// Database connection pool size
    #[dotenv("DATABASE_POOL_SIZE")]
    pool_size: u32,

    /// Database password
    #[dotenv(key = "DATABASE_PASSWORD", secret)]
    password: String,
}

/// Application configuration
#[derive(Record)]
struct AppConfig {
    /// Application name shown in logs
    #[dotenv("APP_NAME")]
    name: String,

    #[dotenv("APP_GREETING")]
    greeting: String,

    #[dotenv("APP_FEATURES")]
    features: Vec<String>,

    database: DatabaseConfig,
}

fn main() -> dotfeed::Result<()> {
    let mut defaults = AppConfig {
        name: "my-app".to_string(),
        greeting: "  hello, # world  ".to_string(),
        features: vec!["search".to_string(), "export".to_string()],
        database: DatabaseConfig {
            url: "postgres://localhost/app".to_string(),
            pool_size: 10,
            password: "not-rendered".to_string(),
        },
    };

    print!("{}", dotfeed::example::render(&mut defaults)?);
    Ok(())
}
