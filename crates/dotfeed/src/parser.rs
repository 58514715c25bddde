//! The dotenv document parser.
//!
//! A character-level state machine that turns a dotenv document into a
//! [`ParseResult`]. Each physical line is scanned left to right in one of two
//! states, `Key` and `Value`, with a quote sub-state that survives line
//! breaks so quoted values may span several lines.
//!
//! # Grammar
//!
//! ```text
//! # comment                      ignored
//! KEY=value                      "value"
//! export KEY = value   # note    "value"   (prefix, spaces and comment dropped)
//! KEY="  padded  "               "  padded  "
//! KEY='single' / KEY=`tick`      quotes of any kind, matching quote closes
//! KEY="a\"b"                     a"b      (`\` escapes only the closing quote)
//! KEY="line one
//! line two"                      "line one\nline two"
//! ```
//!
//! Parsing is fail-fast: the first malformed line, or a quote still open at
//! the end of the document, aborts with a [`SyntaxError`] and no partial
//! result.

use std::collections::HashMap;
use std::collections::hash_map;
use std::io::Read;

use miette::{NamedSource, SourceSpan};

use crate::error::{Error, LineFault, SyntaxError};
use crate::tracing_macros::trace;

/// Name given to documents that do not come from a named source.
pub(crate) const ANONYMOUS_SOURCE: &str = "<dotenv>";

const EXPORT_PREFIX: &str = "export";

/// A parsed `KEY=VALUE` entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    /// The key, trimmed and without any `export` prefix.
    pub key: String,

    /// The value with quotes resolved.
    pub value: String,

    /// 1-based line on which the entry starts.
    pub line: usize,
}

/// The key/value mapping produced by the parser.
///
/// Keys are unique: when a document defines a key twice, the later entry
/// replaces the earlier one. Iteration order is unspecified.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseResult {
    entries: HashMap<String, Entry>,
}

impl ParseResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.value.as_str())
    }

    /// Returns the full entry for `key`, including its line number.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Returns `true` if the document defined `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the document defined no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Inserts an entry, replacing any previous entry with the same key.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.key.clone(), entry)
    }

    /// Consumes the result, returning a plain `key -> value` map.
    pub fn into_map(self) -> HashMap<String, String> {
        self.entries
            .into_iter()
            .map(|(key, entry)| (key, entry.value))
            .collect()
    }
}

impl IntoIterator for ParseResult {
    type Item = Entry;
    type IntoIter = hash_map::IntoValues<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl FromIterator<Entry> for ParseResult {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut result = Self::new();
        for entry in iter {
            result.insert(entry);
        }
        result
    }
}

/// Parses a dotenv document from UTF-8 text.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for a malformed line or an unterminated quote.
pub fn parse_str(input: &str) -> Result<ParseResult, Error> {
    parse_named(input, ANONYMOUS_SOURCE)
}

/// Parses a dotenv document from UTF-8 bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] if `input` is not UTF-8, otherwise as
/// [`parse_str`].
pub fn parse_bytes(input: &[u8]) -> Result<ParseResult, Error> {
    let text = std::str::from_utf8(input)?;
    parse_str(text)
}

/// Reads a whole document from `reader` and parses it.
///
/// # Errors
///
/// Returns [`Error::Source`] if reading fails, otherwise as [`parse_bytes`].
pub fn parse_reader<R: Read>(mut reader: R) -> Result<ParseResult, Error> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    parse_bytes(&buf)
}

/// Parses `input`, labelling diagnostics with `name`.
pub(crate) fn parse_named(input: &str, name: &str) -> Result<ParseResult, Error> {
    Scanner::new(input, name).run().map_err(Error::from)
}

/// Which half of a `KEY=VALUE` line is being accumulated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Key,
    Value,
}

/// The kind of quote that opened a value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Quote {
    Single,
    Double,
    Backtick,
}

impl Quote {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Self::Single),
            '"' => Some(Self::Double),
            '`' => Some(Self::Backtick),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
            Self::Backtick => '`',
        }
    }
}

/// Scanning state for one document.
///
/// Everything except `result` describes the entry currently being built;
/// `quote` is what carries an entry across line boundaries.
struct Scanner<'a> {
    src: &'a str,
    name: &'a str,
    result: ParseResult,

    state: State,
    key: String,
    value: String,

    /// Open quote, if the value is inside a quoted region.
    quote: Option<Quote>,
    /// Byte offset of the open quote, for diagnostics.
    quote_offset: usize,
    /// The value began with a quote (disables trimming).
    quoted: bool,
    /// The quoted region closed; the rest of the line is ignored.
    closed: bool,
    /// Some value content or a quote has been accepted.
    value_started: bool,
    /// The previous character inside the quoted region was `\`.
    escape: bool,

    entry_line: usize,
    entry_offset: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, name: &'a str) -> Self {
        Self {
            src,
            name,
            result: ParseResult::new(),
            state: State::Key,
            key: String::new(),
            value: String::new(),
            quote: None,
            quote_offset: 0,
            quoted: false,
            closed: false,
            value_started: false,
            escape: false,
            entry_line: 1,
            entry_offset: 0,
        }
    }

    fn run(mut self) -> Result<ParseResult, SyntaxError> {
        let src = self.src;
        let mut offset = 0;

        for (index, raw_line) in src.split('\n').enumerate() {
            let line_no = index + 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

            self.scan_line(line, offset, line_no)?;

            offset += raw_line.len() + 1;
        }

        if let Some(quote) = self.quote {
            return Err(SyntaxError::UnterminatedQuote {
                quote: quote.as_char(),
                src: self.source(),
                span: SourceSpan::new(self.quote_offset.into(), 1),
            });
        }

        Ok(self.result)
    }

    fn scan_line(&mut self, line: &str, offset: usize, line_no: usize) -> Result<(), SyntaxError> {
        if self.quote.is_some() {
            // Continuation of a multi-line quoted value.
            self.value.push('\n');
            self.escape = false;
        } else {
            self.reset(line_no, offset);
        }

        for (idx, c) in line.char_indices() {
            if self.closed {
                break;
            }

            if let Some(quote) = self.quote {
                self.scan_quoted(quote, c);
                continue;
            }

            match self.state {
                State::Key => match c {
                    '#' => break,
                    '=' => self.state = State::Value,
                    _ => self.key.push(c),
                },

                State::Value if !self.value_started => match c {
                    ' ' | '\t' => {}
                    '#' => break,
                    _ => {
                        self.value_started = true;
                        if let Some(quote) = Quote::from_char(c) {
                            self.quote = Some(quote);
                            self.quote_offset = offset + idx;
                            self.quoted = true;
                        } else {
                            self.value.push(c);
                        }
                    }
                },

                State::Value => match c {
                    '#' => break,
                    _ => self.value.push(c),
                },
            }
        }

        if self.quote.is_some() {
            return Ok(());
        }

        self.finalize(line, offset)
    }

    fn scan_quoted(&mut self, quote: Quote, c: char) {
        if c == quote.as_char() {
            if self.escape {
                self.value.pop();
                self.value.push(c);
                self.escape = false;
            } else {
                self.quote = None;
                self.closed = true;
            }
            return;
        }

        self.escape = c == '\\';
        self.value.push(c);
    }

    fn finalize(&mut self, line: &str, offset: usize) -> Result<(), SyntaxError> {
        let raw_key = self.key.trim();

        if self.state == State::Key {
            if raw_key.is_empty() {
                return Ok(());
            }
            return Err(self.line_error(LineFault::MissingSeparator, line, offset));
        }

        let key = strip_export(raw_key);
        if key.is_empty() {
            return Err(self.line_error(LineFault::MissingKey, line, offset));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(self.line_error(LineFault::InvalidKey, line, offset));
        }

        let value = if self.quoted {
            std::mem::take(&mut self.value)
        } else {
            self.value.trim().to_string()
        };

        trace!(key, line = self.entry_line, "parsed entry");

        self.result.insert(Entry {
            key: key.to_string(),
            value,
            line: self.entry_line,
        });

        Ok(())
    }

    fn reset(&mut self, line_no: usize, offset: usize) {
        self.state = State::Key;
        self.key.clear();
        self.value.clear();
        self.quoted = false;
        self.closed = false;
        self.value_started = false;
        self.escape = false;
        self.entry_line = line_no;
        self.entry_offset = offset;
    }

    /// Builds an error for the entry ending on the current line.
    ///
    /// Multi-line entries are reported at the line they started on, with the
    /// span covering every line of the entry.
    fn line_error(&self, fault: LineFault, line: &str, offset: usize) -> SyntaxError {
        let len = offset + line.len() - self.entry_offset;

        SyntaxError::invalid_line(
            self.entry_line,
            fault,
            self.source(),
            SourceSpan::new(self.entry_offset.into(), len),
        )
    }

    fn source(&self) -> NamedSource<String> {
        NamedSource::new(self.name, self.src.to_string())
    }
}

/// Removes a leading `export` keyword followed by whitespace.
fn strip_export(key: &str) -> &str {
    match key.strip_prefix(EXPORT_PREFIX) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => key,
    }
}
