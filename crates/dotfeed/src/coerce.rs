//! String-to-type coercion for tagged fields.
//!
//! The mapper never converts values itself; it hands the raw string to the
//! field's [`Coerce`] implementation. Implementations are provided for the
//! usual configuration types:
//!
//! | Type | Accepted input |
//! |------|----------------|
//! | `String` | anything |
//! | `bool` | `1 t T TRUE true True` / `0 f F FALSE false False` |
//! | integers, floats | anything their `FromStr` accepts |
//! | `char` | exactly one character |
//! | `PathBuf`, `IpAddr`, `SocketAddr`, ... | their `FromStr` syntax |
//! | `Option<T>` | empty string is `None`, anything else goes to `T` |
//! | `Vec<T>` | comma separated items, each trimmed and coerced to `T` |
//!
//! With the `serde` feature, [`Json<T>`] deserializes the value as JSON.
//! With the `secrecy` feature, `SecretString` is supported.

use std::error::Error as StdError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Separator used by the `Vec<T>` implementation.
pub const LIST_DELIMITER: char = ',';

/// A value could not be converted into the requested type.
#[derive(Debug, thiserror::Error)]
#[error("expected {expected}: {message}")]
pub struct CoerceError {
    expected: &'static str,
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CoerceError {
    /// Creates an error with a plain message.
    pub fn new(expected: &'static str, message: impl Into<String>) -> Self {
        Self {
            expected,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping the underlying parse failure.
    pub fn with_source<E>(expected: &'static str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            expected,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// The name of the type the value was meant to become.
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// Drops the message and source, which may quote the raw value.
    #[must_use]
    pub fn redacted(self) -> Self {
        Self::new(self.expected, "<redacted>")
    }
}

/// Conversion between a raw dotenv value and a typed field.
///
/// `render` is the inverse used by [`crate::example::render`]; feeding the
/// rendered string back through `coerce` yields an equal value. The
/// template itself has limits on what it can carry; see
/// [`crate::example`].
pub trait Coerce: Sized {
    /// Human readable type name used in error messages.
    const TYPE_NAME: &'static str;

    /// Converts a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError`] when `raw` is not a valid `Self`.
    fn coerce(raw: &str) -> Result<Self, CoerceError>;

    /// Renders the value back into dotenv value syntax (unquoted).
    fn render(&self) -> String;
}

/// Implements [`Coerce`] through `FromStr` + `Display`.
macro_rules! coerce_from_str {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Coerce for $t {
                const TYPE_NAME: &'static str = stringify!($t);

                fn coerce(raw: &str) -> Result<Self, CoerceError> {
                    <$t as FromStr>::from_str(raw)
                        .map_err(|e| CoerceError::with_source(Self::TYPE_NAME, e))
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

coerce_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, IpAddr, Ipv4Addr,
    Ipv6Addr, SocketAddr,
);

impl Coerce for String {
    const TYPE_NAME: &'static str = "String";

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl Coerce for bool {
    const TYPE_NAME: &'static str = "bool";

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            other => Err(CoerceError::new(
                Self::TYPE_NAME,
                format!("{other:?} is not a boolean"),
            )),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl Coerce for char {
    const TYPE_NAME: &'static str = "char";

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CoerceError::new(
                Self::TYPE_NAME,
                format!("expected exactly one character, got {}", raw.chars().count()),
            )),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl Coerce for PathBuf {
    const TYPE_NAME: &'static str = "PathBuf";

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(PathBuf::from(raw))
    }

    fn render(&self) -> String {
        self.display().to_string()
    }
}

impl<T: Coerce> Coerce for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        if raw.is_empty() {
            Ok(None)
        } else {
            T::coerce(raw).map(Some)
        }
    }

    fn render(&self) -> String {
        self.as_ref().map(Coerce::render).unwrap_or_default()
    }
}

impl<T: Coerce> Coerce for Vec<T> {
    const TYPE_NAME: &'static str = "list";

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        raw.split(LIST_DELIMITER)
            .map(|item| T::coerce(item.trim()))
            .collect()
    }

    fn render(&self) -> String {
        self.iter()
            .map(Coerce::render)
            .collect::<Vec<_>>()
            .join(&LIST_DELIMITER.to_string())
    }
}

/// A field whose value is a JSON document.
///
/// ```rust,ignore
/// #[derive(Record)]
/// struct Config {
///     #[dotenv(key = "LIMITS")]
///     limits: Json<HashMap<String, u32>>,
/// }
/// // LIMITS='{"read": 10, "write": 2}'
/// ```
#[cfg(feature = "serde")]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

#[cfg(feature = "serde")]
impl<T> Coerce for Json<T>
where
    T: serde::de::DeserializeOwned + serde::Serialize,
{
    const TYPE_NAME: &'static str = "JSON";

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        serde_json::from_str(raw)
            .map(Json)
            .map_err(|e| CoerceError::with_source(Self::TYPE_NAME, e))
    }

    fn render(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

#[cfg(feature = "secrecy")]
impl Coerce for secrecy::SecretString {
    const TYPE_NAME: &'static str = "SecretString";

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(secrecy::SecretString::from(raw.to_string()))
    }

    // Never leaks into generated templates.
    fn render(&self) -> String {
        String::new()
    }
}
