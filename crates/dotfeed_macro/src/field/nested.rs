//! Untagged field implementation.
//!
//! A field without `#[dotenv]` is handed to the mapper as a `Target`. If it
//! holds a record (directly or behind `Option`, `Box`, `Rc<RefCell<_>>`,
//! `Arc<Mutex<_>>`) the mapper recurses into it; leaf types are ignored.
//!
//! ```rust,ignore
//! database: DatabaseConfig,
//! // ::dotfeed::Field::nested("database", None, &mut self.database)
//! ```
//!
//! A field type with no `Target` impl needs `#[dotenv(skip)]`.

use proc_macro2::TokenStream as QuoteStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{Ident, Type, WherePredicate, parse_quote};

use super::{FieldGenerator, doc_tokens};

/// An untagged field: a possible nested record.
pub struct NestedField {
    /// The struct field name
    pub name: Ident,

    /// The field's type
    pub ty: Type,

    /// Doc comment
    pub doc: Option<String>,
}

impl FieldGenerator for NestedField {
    fn generate_entry(&self) -> QuoteStream {
        let name = &self.name;
        let name_str = name.to_string();
        let doc = doc_tokens(self.doc.as_deref());

        let target_ty = quote_spanned! {self.ty.span()=> &mut dyn ::dotfeed::Target };

        quote! {
            ::dotfeed::Field::nested(#name_str, #doc, &mut self.#name as #target_ty)
        }
    }

    fn bound(&self) -> WherePredicate {
        let ty = &self.ty;
        parse_quote!(#ty: ::dotfeed::Target)
    }
}
