//! Field classification and code generation for the `Record` derive.
//!
//! Each named field of the struct becomes one entry of the generated
//! `Record::fields()` list, or nothing at all:
//!
//! | Type | Attribute | Generated entry |
//! |------|-----------|-----------------|
//! | [`TaggedField`] | `#[dotenv(key = "...")]` | `Field::tagged(..)` |
//! | [`NestedField`] | none | `Field::nested(..)` |
//! | (skipped) | `#[dotenv(skip)]` | none |
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   syn::Field    │  Raw AST from derive input
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  FieldFactory   │  Parses #[dotenv] and classifies the field
//! │  ::parse_field  │
//! └────────┬────────┘
//!          │  Option<Box<dyn FieldGenerator>>
//!          ▼
//! ┌─────────────────┐
//! │ FieldGenerator  │──► generate_entry()  one `Field` expression
//! │                 │──► bound()           where-clause predicate
//! └─────────────────┘
//! ```

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::{Field, Result as SynResult, WherePredicate};

use crate::parse::{FieldConfig, Parser, extract_doc_comment};

mod nested;
mod tagged;

pub use nested::NestedField;
pub use tagged::TaggedField;

/// Code generation for one field.
pub trait FieldGenerator {
    /// Expression building the field's `::dotfeed::Field` entry.
    fn generate_entry(&self) -> QuoteStream;

    /// Bound the field's type must satisfy in generic structs.
    fn bound(&self) -> WherePredicate;
}

/// Turns an optional doc string into an `Option<&'static str>` expression.
pub(crate) fn doc_tokens(doc: Option<&str>) -> QuoteStream {
    match doc {
        Some(doc) => quote! { ::core::option::Option::Some(#doc) },
        None => quote! { ::core::option::Option::None },
    }
}

/// Classifies struct fields into generators.
pub struct FieldFactory;

impl FieldFactory {
    /// Parses a named field.
    ///
    /// Returns `None` for `#[dotenv(skip)]` fields.
    pub fn parse_field(field: &Field) -> SynResult<Option<Box<dyn FieldGenerator>>> {
        let Some(name) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "Record fields must be named"));
        };
        let ty = field.ty.clone();
        let doc = extract_doc_comment(field);

        let generator: Box<dyn FieldGenerator> = match Parser::parse_field_config(field)? {
            FieldConfig::Skip => return Ok(None),

            FieldConfig::Tagged(attr) => Box::new(TaggedField {
                name,
                ty,
                key: attr.key,
                secret: attr.secret,
                doc,
            }),

            FieldConfig::Untagged => Box::new(NestedField { name, ty, doc }),
        };

        Ok(Some(generator))
    }
}
