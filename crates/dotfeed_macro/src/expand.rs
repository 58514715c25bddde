//! Code generation orchestration for the `Record` derive macro.
//!
//! The [`Expander`] coordinates the expansion:
//!
//! 1. **Validation** - Ensures input is a struct with named fields
//! 2. **Parsing** - Converts each field into a [`FieldGenerator`]
//! 3. **Generation** - Produces the `Record` and `Target` impls
//!
//! # Generated Code
//!
//! ```rust,ignore
//! impl ::dotfeed::Record for Config {
//!     fn fields(&mut self) -> Vec<::dotfeed::Field<'_>> {
//!         vec![
//!             ::dotfeed::Field::tagged("port", "PORT", false, None, &mut self.port as _),
//!             ::dotfeed::Field::nested("database", None, &mut self.database as _),
//!         ]
//!     }
//! }
//!
//! impl ::dotfeed::Target for Config {
//!     fn with_record(&mut self, visit: &mut ::dotfeed::Visit<'_>) -> Result<bool, ::dotfeed::Error> {
//!         visit(self)?;
//!         Ok(true)
//!     }
//! }
//! ```

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Data, DeriveInput, Error as SynError, Field, Fields, Generics, Result as SynResult};

use crate::field::{FieldFactory, FieldGenerator};

/// The main orchestrator for macro expansion.
pub struct Expander;

impl Expander {
    /// Main entry point for expanding the derive macro.
    pub fn expand(input: &DeriveInput) -> SynResult<QuoteStream> {
        let struct_name = &input.ident;

        let fields = Self::extract_struct_fields(input)?;

        let generators: Vec<Box<dyn FieldGenerator>> = fields
            .iter()
            .map(FieldFactory::parse_field)
            .collect::<SynResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        let generics = Self::bounded_generics(&input.generics, &generators);
        let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

        let entries = generators.iter().map(|g| g.generate_entry());

        Ok(quote! {
            #[automatically_derived]
            impl #impl_generics ::dotfeed::Record for #struct_name #type_generics #where_clause {
                fn fields(&mut self) -> ::std::vec::Vec<::dotfeed::Field<'_>> {
                    ::std::vec![#(#entries),*]
                }
            }

            #[automatically_derived]
            impl #impl_generics ::dotfeed::Target for #struct_name #type_generics #where_clause {
                fn with_record(
                    &mut self,
                    visit: &mut ::dotfeed::Visit<'_>,
                ) -> ::core::result::Result<bool, ::dotfeed::Error> {
                    visit(self as &mut dyn ::dotfeed::Record)?;
                    ::core::result::Result::Ok(true)
                }
            }
        })
    }

    /// Adds a bound per field when the struct has type parameters.
    ///
    /// Concrete structs get no extra predicates, so a field type that cannot
    /// be fed is reported at the field rather than at the impl.
    fn bounded_generics(generics: &Generics, generators: &[Box<dyn FieldGenerator>]) -> Generics {
        let mut generics = generics.clone();

        if generics.type_params().next().is_some() {
            let where_clause = generics.make_where_clause();
            for generator in generators {
                where_clause.predicates.push(generator.bound());
            }
        }

        generics
    }

    /// Extract named fields from the struct, rejecting invalid types.
    fn extract_struct_fields(input: &DeriveInput) -> SynResult<&Punctuated<Field, Comma>> {
        match &input.data {
            Data::Struct(data_struct) => match &data_struct.fields {
                Fields::Named(fields_named) => Ok(&fields_named.named),

                Fields::Unnamed(_) => Err(SynError::new_spanned(
                    input,
                    "Record does not support tuple structs",
                )),

                Fields::Unit => Err(SynError::new_spanned(
                    input,
                    "Record does not support unit structs",
                )),
            },

            Data::Enum(_) => Err(SynError::new_spanned(
                input,
                "Record can only be derived for structs, not enums",
            )),

            Data::Union(_) => Err(SynError::new_spanned(
                input,
                "Record can only be derived for structs, not unions",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(input: &DeriveInput) -> SynResult<String> {
        Expander::expand(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_rejects_non_structs() {
        let cases: Vec<(DeriveInput, &str)> = vec![
            (parse_quote! { enum E { A } }, "not enums"),
            (parse_quote! { union U { a: u8 } }, "not unions"),
            (parse_quote! { struct T(u8); }, "tuple structs"),
            (parse_quote! { struct U; }, "unit structs"),
        ];

        for (input, expected) in cases {
            let err = expand(&input).unwrap_err().to_string();
            assert!(err.contains(expected), "{err:?} should contain {expected:?}");
        }
    }

    #[test]
    fn test_generates_both_impls() {
        let input: DeriveInput = parse_quote! {
            struct Config {
                #[dotenv("PORT")]
                port: u16,
                database: Database,
                #[dotenv(skip)]
                cache: Cache,
            }
        };

        let out = expand(&input).unwrap();

        assert!(out.contains(":: dotfeed :: Record for Config"));
        assert!(out.contains(":: dotfeed :: Target for Config"));
        assert!(out.contains("\"PORT\""));
        assert!(out.contains("\"database\""));
        assert!(!out.contains("cache"));
    }

    #[test]
    fn test_generic_struct_gets_bounds() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T> {
                #[dotenv("VALUE")]
                value: T,
            }
        };

        let out = expand(&input).unwrap();

        assert!(out.contains("T : :: dotfeed :: Assign"));
    }
}
