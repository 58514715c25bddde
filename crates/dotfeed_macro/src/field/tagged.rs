//! Tagged field implementation.
//!
//! ```rust,ignore
//! #[dotenv(key = "DB_PORT", secret)]
//! port: u16,
//! ```
//!
//! generates
//!
//! ```rust,ignore
//! ::dotfeed::Field::tagged("port", "DB_PORT", true, None, &mut self.port)
//! ```
//!
//! The field type must implement `Assign`, which every `Coerce` type does.

use proc_macro2::TokenStream as QuoteStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{Ident, LitStr, Type, WherePredicate, parse_quote};

use super::{FieldGenerator, doc_tokens};

/// A field fed from a single key.
pub struct TaggedField {
    /// The struct field name
    pub name: Ident,

    /// The field's type
    pub ty: Type,

    /// Key looked up in the document
    pub key: LitStr,

    /// Redact the value in errors and templates
    pub secret: bool,

    /// Doc comment for template generation
    pub doc: Option<String>,
}

impl FieldGenerator for TaggedField {
    fn generate_entry(&self) -> QuoteStream {
        let name = &self.name;
        let name_str = name.to_string();
        let key = &self.key;
        let secret = self.secret;
        let doc = doc_tokens(self.doc.as_deref());

        // Spanned at the field type so a missing `Coerce` impl points there.
        let slot_ty = quote_spanned! {self.ty.span()=> &mut dyn ::dotfeed::Assign };

        quote! {
            ::dotfeed::Field::tagged(#name_str, #key, #secret, #doc, &mut self.#name as #slot_ty)
        }
    }

    fn bound(&self) -> WherePredicate {
        let ty = &self.ty;
        parse_quote!(#ty: ::dotfeed::Assign)
    }
}
