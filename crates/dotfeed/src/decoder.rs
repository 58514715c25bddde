//! Decoding a dotenv source straight into a record.
//!
//! A [`Decoder`] wraps a byte source. [`Decoder::decode`] reads it to the
//! end, parses it and feeds the result into the destination. When reading or
//! parsing fails the destination is not touched at all.
//!
//! ```rust,ignore
//! use dotfeed::{Decoder, Record};
//!
//! #[derive(Record, Default)]
//! struct Config {
//!     #[dotenv("APP_NAME")]
//!     name: String,
//! }
//!
//! let mut config = Config::default();
//! Decoder::from_path(".env")?.decode(&mut config)?;
//! ```

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::Error;
use crate::mapper::{FeedReport, Mapper};
use crate::parser::{ANONYMOUS_SOURCE, ParseResult, parse_named};
use crate::record::Target;
use crate::tracing_macros::debug;

/// Reads, parses and maps a dotenv document.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    name: String,
    prefix: Option<String>,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder over any byte source.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            name: ANONYMOUS_SOURCE.to_string(),
            prefix: None,
        }
    }

    /// Names the source in syntax diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Prepends `prefix` to every key before lookup.
    ///
    /// See [`Mapper::with_prefix`].
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Reads and parses the whole source without mapping it.
    ///
    /// # Errors
    ///
    /// - [`Error::Source`] if reading fails.
    /// - [`Error::InvalidUtf8`] if the source is not UTF-8.
    /// - [`Error::Syntax`] if the document is malformed.
    pub fn read(mut self) -> Result<ParseResult, Error> {
        self.read_entries()
    }

    /// Reads, parses and feeds the source into `target`.
    ///
    /// # Errors
    ///
    /// Everything [`Decoder::read`] returns, plus the mapping errors of
    /// [`Mapper::feed`]. A read or parse failure leaves `target` untouched.
    pub fn decode<T: Target + ?Sized>(mut self, target: &mut T) -> Result<FeedReport, Error> {
        let entries = self.read_entries()?;

        let mapper = Mapper::new(&entries);
        let mapper = match self.prefix.as_deref() {
            Some(p) => mapper.with_prefix(p),
            None => mapper,
        };

        let report = mapper.feed(target)?;

        debug!(
            source = %self.name,
            assigned = report.assigned.len(),
            untouched = report.untouched.len(),
            "decoded dotenv source"
        );

        Ok(report)
    }

    fn read_entries(&mut self) -> Result<ParseResult, Error> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf)?;

        let text = std::str::from_utf8(&buf)?;
        let entries = parse_named(text, &self.name)?;

        debug!(source = %self.name, entries = entries.len(), "parsed dotenv source");
        Ok(entries)
    }
}

impl Decoder<File> {
    /// Opens the file at `path`.
    ///
    /// Diagnostics name the file by its path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`] if the file cannot be opened.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(file).named(path.display().to_string()))
    }
}

/// Decodes an in-memory document into `target`.
///
/// # Errors
///
/// See [`Decoder::decode`].
pub fn decode_str<T: Target + ?Sized>(input: &str, target: &mut T) -> Result<FeedReport, Error> {
    Decoder::new(Cursor::new(input.as_bytes())).decode(target)
}

/// Decodes the file at `path` into `target`.
///
/// # Errors
///
/// See [`Decoder::from_path`] and [`Decoder::decode`].
pub fn decode_path<T: Target + ?Sized>(
    path: impl AsRef<Path>,
    target: &mut T,
) -> Result<FeedReport, Error> {
    Decoder::from_path(path)?.decode(target)
}
