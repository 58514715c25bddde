//! # dotfeed_macro
//!
//! Procedural macro implementation for the `dotfeed` crate.
//!
//! This crate provides `#[derive(Record)]`, which lets the `dotfeed` mapper
//! walk a struct's fields. It is a proc-macro crate and can only export
//! procedural macros.
//!
//! **Note:** Users should depend on the `dotfeed` crate, not this one directly.
//! The `dotfeed` crate re-exports this macro along with the runtime types.
//!
//! # Module Structure
//!
//! - `parse` - Attribute parsing for `#[dotenv(...)]`
//! - `field` - Field classification and per-field code generation
//! - `expand` - Macro expansion orchestration

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// Internal modules - not exposed publicly
mod expand;
mod field;
mod parse;

/// Derive macro making a struct a destination for dotenv values.
///
/// Generates `dotfeed::Record` (the list of fields the mapper may feed)
/// and `dotfeed::Target` (so the struct can be passed to `decode` and be
/// nested inside other records).
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `key = "NAME"` | Key that feeds the field |
/// | `"NAME"` | Shorthand for `key = "NAME"` |
/// | `secret` | Redact the value in errors and templates (needs a key) |
/// | `skip` | Ignore the field |
///
/// A field without `#[dotenv]` is fed recursively if it holds a record
/// (directly or behind `Option`, `Box`, `Rc<RefCell<_>>` or
/// `Arc<Mutex<_>>`), and ignored otherwise.
///
/// # Example
///
/// ```rust,ignore
/// use dotfeed::Record;
///
/// #[derive(Record, Default)]
/// struct Config {
///     /// Public name of the service
///     #[dotenv(key = "APP_NAME")]
///     name: String,
///
///     #[dotenv("API_TOKEN", secret)]
///     token: String,
///
///     database: Database,
///
///     #[dotenv(skip)]
///     started_at: Option<std::time::Instant>,
/// }
/// ```
///
/// # Compile Errors
///
/// - Enums, unions, tuple structs and unit structs
/// - Unknown or duplicated options, or two `#[dotenv]` attributes on a field
/// - `secret` without a key, `skip` combined with anything
/// - Empty keys, or keys containing whitespace, `=` or `#`
#[proc_macro_derive(Record, attributes(dotenv))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    // On error, convert to a compile_error!() invocation for better error messages
    expand::Expander::expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
