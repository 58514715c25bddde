//! The field mapper: feeds a [`ParseResult`] into a record.
//!
//! For every field of the destination:
//!
//! | Field | Behavior |
//! |-------|----------|
//! | tagged, key present | value coerced and written, or [`Error::Field`] |
//! | tagged, key absent | left untouched (keeps caller defaults) |
//! | untagged record | fed recursively from the same mapping |
//! | untagged pointer to a record | followed when non-null, then as above |
//! | untagged leaf | ignored |
//!
//! Feeding is not transactional: when a field fails, fields visited earlier
//! keep their new values.

use std::fmt::{self, Display, Formatter};

use crate::error::Error;
use crate::parser::ParseResult;
use crate::record::{FieldKind, Record, Tag, Target};
use crate::tracing_macros::trace;

/// A field that was written by the mapper.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    /// Dotted path of the field (`database.port`).
    pub field: String,

    /// The key the value came from, including any prefix.
    pub key: String,

    /// Line of the document the entry started on.
    pub line: usize,
}

/// What a feed did to the destination record.
///
/// # Example
///
/// ```rust,ignore
/// let report = dotfeed::decode_str(input, &mut config)?;
/// println!("{report}");
/// // app_name   <- APP_NAME (line 1)
/// // app_url       not set, kept current value
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FeedReport {
    /// Fields that received a value, in visiting order.
    pub assigned: Vec<Assignment>,

    /// Tagged fields whose key was not in the document, as `(field, key)`.
    pub untouched: Vec<(String, String)>,
}

impl FeedReport {
    /// Returns the assignment for a field path.
    pub fn get(&self, field: &str) -> Option<&Assignment> {
        self.assigned.iter().find(|a| a.field == field)
    }

    /// Returns `true` if the field path was left untouched.
    pub fn is_untouched(&self, field: &str) -> bool {
        self.untouched.iter().any(|(f, _)| f == field)
    }
}

impl Display for FeedReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let width = self
            .assigned
            .iter()
            .map(|a| a.field.len())
            .chain(self.untouched.iter().map(|(field, _)| field.len()))
            .max()
            .unwrap_or(0);

        for a in &self.assigned {
            writeln!(f, "{:<width$} <- {} (line {})", a.field, a.key, a.line)?;
        }

        for (field, key) in &self.untouched {
            writeln!(f, "{field:<width$}    {key} not set, kept current value")?;
        }

        Ok(())
    }
}

/// Feeds parsed entries into records.
///
/// ```rust,ignore
/// let entries = dotfeed::parse_str("APP_PORT=8080")?;
/// let report = Mapper::new(&entries).feed(&mut config)?;
/// ```
#[derive(Clone, Debug)]
pub struct Mapper<'a> {
    entries: &'a ParseResult,
    prefix: Option<&'a str>,
}

impl<'a> Mapper<'a> {
    /// Creates a mapper over `entries`.
    pub fn new(entries: &'a ParseResult) -> Self {
        Self {
            entries,
            prefix: None,
        }
    }

    /// Prepends `prefix` to every key before lookup.
    ///
    /// With prefix `APP_`, a field tagged `PORT` is fed from `APP_PORT`.
    pub fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Feeds `target`, which must be (or point to) a record.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTarget`] if `target` is not a record; nothing is
    ///   written.
    /// - [`Error::Field`] for the first field whose value cannot be coerced.
    pub fn feed<T: Target + ?Sized>(&self, target: &mut T) -> Result<FeedReport, Error> {
        let mut report = FeedReport::default();

        let fed = target.with_record(&mut |record: &mut dyn Record| {
            self.feed_record(record, "", &mut report)
        })?;

        if !fed {
            return Err(Error::invalid_target(target.target_name()));
        }

        Ok(report)
    }

    fn feed_record(
        &self,
        record: &mut dyn Record,
        path: &str,
        report: &mut FeedReport,
    ) -> Result<(), Error> {
        for field in record.fields() {
            let field_path = if path.is_empty() {
                field.name.to_string()
            } else {
                format!("{path}.{}", field.name)
            };

            match field.kind {
                FieldKind::Tagged(tag) => self.feed_tagged(tag, field_path, report)?,

                FieldKind::Nested(target) => {
                    let nested = target.with_record(&mut |record: &mut dyn Record| {
                        trace!(field = %field_path, "entering nested record");
                        self.feed_record(record, &field_path, report)
                    })?;

                    if !nested {
                        trace!(field = %field_path, "untagged leaf field skipped");
                    }
                }
            }
        }

        Ok(())
    }

    fn feed_tagged(
        &self,
        tag: Tag<'_>,
        field_path: String,
        report: &mut FeedReport,
    ) -> Result<(), Error> {
        let key = self.lookup_key(tag.key);

        let Some(entry) = self.entries.entry(&key) else {
            trace!(field = %field_path, key = %key, "no entry, keeping current value");
            report.untouched.push((field_path, key));
            return Ok(());
        };

        if let Err(source) = tag.slot.assign(&entry.value) {
            return Err(Error::field(
                field_path,
                key,
                entry.value.as_str(),
                tag.secret,
                source,
            ));
        }

        trace!(field = %field_path, key = %key, line = entry.line, "assigned field");
        report.assigned.push(Assignment {
            field: field_path,
            key,
            line: entry.line,
        });

        Ok(())
    }

    fn lookup_key(&self, key: &str) -> String {
        match self.prefix {
            Some(p) => format!("{p}{key}"),
            None => key.to_string(),
        }
    }
}

/// Feeds `entries` into `target`.
///
/// Shorthand for [`Mapper::new(entries).feed(target)`](Mapper::feed).
///
/// # Errors
///
/// See [`Mapper::feed`].
pub fn feed<T: Target + ?Sized>(entries: &ParseResult, target: &mut T) -> Result<FeedReport, Error> {
    Mapper::new(entries).feed(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use crate::record::{Field, Visit};

    #[derive(Default)]
    struct Database {
        host: String,
        port: u16,
    }

    impl Record for Database {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::tagged("host", "DB_HOST", false, None, &mut self.host),
                Field::tagged("port", "DB_PORT", true, None, &mut self.port),
            ]
        }
    }

    impl Target for Database {
        fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
            visit(self)?;
            Ok(true)
        }
    }

    #[derive(Default)]
    struct App {
        name: String,
        url: String,
        workers: u8,
        database: Database,
        replica: Option<Box<Database>>,
    }

    impl Record for App {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::tagged("name", "APP_NAME", false, None, &mut self.name),
                Field::tagged("url", "APP_URL", false, None, &mut self.url),
                Field::nested("workers", None, &mut self.workers),
                Field::nested("database", None, &mut self.database),
                Field::nested("replica", None, &mut self.replica),
            ]
        }
    }

    impl Target for App {
        fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
            visit(self)?;
            Ok(true)
        }
    }

    #[test]
    fn test_feed_tagged_and_nested() {
        let entries = parse_str("APP_NAME=demo\nDB_HOST=localhost\nDB_PORT=5432").unwrap();
        let mut app = App {
            url: "https://example.com".into(),
            ..App::default()
        };

        let report = feed(&entries, &mut app).unwrap();

        assert_eq!(app.name, "demo");
        assert_eq!(app.url, "https://example.com");
        assert_eq!(app.database.host, "localhost");
        assert_eq!(app.database.port, 5432);
        assert!(app.replica.is_none());

        assert_eq!(report.get("database.port").map(|a| a.line), Some(3));
        assert!(report.is_untouched("url"));
    }

    #[test]
    fn test_non_null_pointer_is_followed() {
        let entries = parse_str("DB_HOST=replica").unwrap();
        let mut app = App {
            replica: Some(Box::default()),
            ..App::default()
        };

        feed(&entries, &mut app).unwrap();

        assert_eq!(app.replica.as_ref().map(|r| r.host.as_str()), Some("replica"));
    }

    #[test]
    fn test_invalid_target() {
        let entries = parse_str("APP_NAME=demo").unwrap();
        let mut number = 0i32;

        let err = feed(&entries, &mut number).unwrap_err();

        assert!(matches!(err, Error::InvalidTarget { .. }));
        assert_eq!(number, 0);
    }

    #[test]
    fn test_field_error_keeps_earlier_assignments() {
        let entries = parse_str("APP_NAME=demo\nDB_HOST=db\nDB_PORT=not-a-port").unwrap();
        let mut app = App::default();

        let err = feed(&entries, &mut app).unwrap_err();

        match &err {
            Error::Field { field, key, .. } => {
                assert_eq!(field, "database.port");
                assert_eq!(key, "DB_PORT");
            }
            other => panic!("expected field error, got {other:?}"),
        }
        // DB_PORT is secret
        assert!(!err.to_string().contains("not-a-port"));
        assert_eq!(app.name, "demo");
        assert_eq!(app.database.host, "db");
    }

    #[test]
    fn test_prefix() {
        let entries = parse_str("APP_DB_HOST=prefixed\nDB_HOST=plain").unwrap();
        let mut db = Database::default();

        let report = Mapper::new(&entries)
            .with_prefix("APP_")
            .feed(&mut db)
            .unwrap();

        assert_eq!(db.host, "prefixed");
        assert_eq!(report.assigned[0].key, "APP_DB_HOST");
    }

    #[test]
    fn test_report_display() {
        let entries = parse_str("DB_HOST=h").unwrap();
        let mut db = Database::default();

        let report = feed(&entries, &mut db).unwrap();
        let text = report.to_string();

        assert!(text.contains("host <- DB_HOST (line 1)"));
        assert!(text.contains("DB_PORT not set"));
    }
}
