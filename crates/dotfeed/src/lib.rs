//! # dotfeed
//!
//! Parse dotenv documents and feed their values into typed Rust structs.
//!
//! `dotfeed` reads a `KEY=VALUE` document (a `.env` file or any byte
//! source) and writes each value into the struct field tagged with its key,
//! converting the text to the field's type on the way. It never touches the
//! process environment.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dotfeed::Record;
//!
//! #[derive(Record, Default)]
//! struct Config {
//!     #[dotenv(key = "APP_NAME")]
//!     name: String,
//!
//!     #[dotenv("APP_PORT")]
//!     port: u16,
//!
//!     #[dotenv(key = "API_TOKEN", secret)]
//!     token: String,
//!
//!     // Untagged: fed recursively from the same document
//!     database: Database,
//! }
//!
//! #[derive(Record, Default)]
//! struct Database {
//!     #[dotenv("DB_URL")]
//!     url: String,
//! }
//!
//! fn main() -> dotfeed::Result<()> {
//!     let mut config = Config { port: 8080, ..Config::default() };
//!     dotfeed::decode_path(".env", &mut config)?;
//!     println!("{} listening on {}", config.name, config.port);
//!     Ok(())
//! }
//! ```
//!
//! Fields whose key is absent keep whatever value they had, so defaults are
//! set by initializing the struct before decoding.
//!
//! ## Document Syntax
//!
//! | Input | Value |
//! |-------|-------|
//! | `KEY=value` | `value` |
//! | `KEY = value  # comment` | `value` |
//! | `export KEY=value` | `value` |
//! | `KEY="  padded  "` | `  padded  ` |
//! | `KEY='it''s'` | `it` (text after the closing quote is ignored) |
//! | `KEY="say \"hi\""` | `say "hi"` |
//! | `KEY="two`<br>`lines"` | `two\nlines` |
//! | `KEY=` | empty string |
//!
//! Duplicate keys: the last occurrence wins.
//!
//! ## Field Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `key = "NAME"` / `"NAME"` | Key that feeds the field |
//! | `secret` | Value is redacted from errors and templates |
//! | `skip` | Field is ignored entirely |
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `tracing` | Emit [`tracing`] events while parsing and mapping | No |
//! | `serde` | [`Json<T>`] fields holding JSON documents | No |
//! | `secrecy` | `SecretString` fields | No |
//! | `full` | Enable all features | No |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Error`], which implements
//! [`miette::Diagnostic`]. Syntax errors carry the document and a labelled
//! span, so returning [`Result`] from `main` renders them like this:
//!
//! ```text
//! dotfeed::syntax::invalid_line
//!
//!   × invalid syntax in line 2: key without `=`
//!    ╭─[.env:2:1]
//!  1 │ APP_NAME=demo
//!  2 │ APP_PORT 8080
//!    · ──────┬──────
//!    ·       ╰── key without `=`
//!    ╰────
//!   help: separate the key from its value with `=`
//! ```
//!
//! Values of fields marked `secret` never appear in `Display` or `Debug`
//! output of an error.
//!
//! [`tracing`]: https://docs.rs/tracing

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// Re-export the derive macro
pub use dotfeed_macro::Record;

// ============================================================================
// Re-exported Dependencies
// ============================================================================

/// Re-export miette for error handling.
/// Users can use `dotfeed::miette` instead of adding miette as a dependency.
pub use miette;

/// Re-export secrecy when the feature is enabled.
#[cfg(feature = "secrecy")]
pub use secrecy;

#[cfg(feature = "secrecy")]
pub use secrecy::{ExposeSecret, SecretString};

// ============================================================================
// Core Modules
// ============================================================================

mod tracing_macros;

mod error;
pub use error::{Error, LineFault, SyntaxError};

/// A Result type that displays errors with miette's fancy formatting.
///
/// ```rust,ignore
/// fn main() -> dotfeed::Result<()> {
///     dotfeed::decode_path(".env", &mut config)?;
///     Ok(())
/// }
/// ```
pub type Result<T> = miette::Result<T>;

pub mod coerce;
pub use coerce::{Coerce, CoerceError};

#[cfg(feature = "serde")]
pub use coerce::Json;

pub mod parser;
pub use parser::{Entry, ParseResult, parse_bytes, parse_reader, parse_str};

pub mod record;
pub use record::{Assign, Field, FieldKind, Tag, Target, Visit};

// Same name as the derive; the trait lives in the type namespace.
#[doc(inline)]
pub use record::Record;

pub mod mapper;
pub use mapper::{Assignment, FeedReport, Mapper, feed};

pub mod decoder;
pub use decoder::{Decoder, decode_path, decode_str};

pub mod example;
