//! Attribute parsing for `#[dotenv(key = "KEY", secret)]`.
//!
//! Uses syn's `ParseNestedMeta` for the option list, which gives comma
//! handling, precise spans and duplicate detection for free. A bare string
//! literal in first position is accepted as shorthand for `key = "..."`.
//!
//! # Supported Syntax
//!
//! ```ignore
//! #[dotenv(key = "APP_PORT")]          // Tagged field
//! #[dotenv("APP_PORT")]                // Same, shorthand
//! #[dotenv("API_TOKEN", secret)]       // Redacted in errors and templates
//! #[dotenv(skip)]                      // Never fed, never recursed into
//! ```
//!
//! A field without any `#[dotenv]` attribute is untagged: the mapper treats it
//! as a possible nested record.
//!
//! # Architecture
//!
//! Same two phases as any builder:
//!
//! 1. **Accumulation**: [`Parser::parse_meta()`] collects options one at a time
//! 2. **Validation**: [`Parser::build_config()`] checks combinations and
//!    produces a [`FieldConfig`]

use std::collections::HashSet;

use syn::meta::ParseNestedMeta;
use syn::parse::{ParseStream, Parser as _};
use syn::{
    Attribute, Error as SynError, Expr, ExprLit, Field, Lit, LitStr, Meta, Result as SynResult,
    Token,
};

/// Name of the field attribute.
const ATTR: &str = "dotenv";

/// Extract doc comments from a field's attributes.
///
/// Multiple `///` lines are joined with a single space so the result fits on
/// one template comment line.
pub fn extract_doc_comment(field: &Field) -> Option<String> {
    let mut result = String::new();

    for attr in &field.attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }

        if let Meta::NameValue(meta) = &attr.meta
            && let Expr::Lit(ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) = &meta.value
        {
            let line = lit_str.value();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if !result.is_empty() {
                result.push(' ');
            }
            result.push_str(line);
        }
    }

    (!result.is_empty()).then_some(result)
}

/// How a field takes part in feeding, as written in its attributes.
pub enum FieldConfig {
    /// `#[dotenv(key = "...")]`: fed from a single key.
    Tagged(DotenvAttr),

    /// No `#[dotenv]` attribute: a recursion point.
    Untagged,

    /// `#[dotenv(skip)]`: left out entirely.
    Skip,
}

/// The parsed options of a tagged field.
pub struct DotenvAttr {
    /// The key that feeds the field.
    pub key: LitStr,

    /// Whether the value is redacted in errors and templates.
    pub secret: bool,
}

/// Builder for one `#[dotenv(...)]` attribute.
#[derive(Default)]
pub struct Parser {
    /// Accumulated key (from `key = "..."` or the shorthand literal).
    key: Option<LitStr>,

    /// Whether `secret` was seen.
    secret: bool,

    /// Whether `skip` was seen.
    skip: bool,

    /// Options seen so far, for duplicate detection.
    seen: HashSet<&'static str>,
}

impl Parser {
    /// Parses the attributes of `field` into its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error spanned at the offending token for unknown or
    /// duplicated options, invalid keys, invalid combinations, or more than
    /// one `#[dotenv]` attribute on the same field.
    pub fn parse_field_config(field: &Field) -> SynResult<FieldConfig> {
        let mut attrs = field.attrs.iter().filter(|a| a.path().is_ident(ATTR));

        let Some(attr) = attrs.next() else {
            return Ok(FieldConfig::Untagged);
        };

        if let Some(extra) = attrs.next() {
            return Err(SynError::new_spanned(
                extra,
                "Duplicate #[dotenv(...)] attribute; combine the options into one",
            ));
        }

        let mut builder = Self::default();
        attr.parse_args_with(|input: ParseStream<'_>| builder.parse_args(input))?;

        builder.build_config(attr)
    }

    /// Parses the attribute's argument list, including the shorthand key.
    fn parse_args(&mut self, input: ParseStream<'_>) -> SynResult<()> {
        if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            self.set_key(lit)?;

            if input.is_empty() {
                return Ok(());
            }
            input.parse::<Token![,]>()?;
        }

        let rest: proc_macro2::TokenStream = input.parse()?;
        syn::meta::parser(|meta| self.parse_meta(meta)).parse2(rest)
    }

    /// Parses a single option from within the attribute.
    #[expect(
        clippy::needless_pass_by_value,
        reason = "ParseNestedMeta is passed by value per syn's parse_nested_meta callback signature"
    )]
    fn parse_meta(&mut self, meta: ParseNestedMeta) -> SynResult<()> {
        let ident = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("Expected identifier"))?;
        let name = ident.to_string();

        match name.as_str() {
            "key" => {
                let lit: LitStr = meta.value()?.parse()?;
                self.set_key(lit)
            }

            "secret" => {
                self.mark_seen("secret", &meta)?;
                self.secret = true;
                Ok(())
            }

            "skip" => {
                self.mark_seen("skip", &meta)?;
                self.skip = true;
                Ok(())
            }

            _ => Err(meta.error(format!(
                "Unknown option `{name}`; expected `key`, `secret` or `skip`"
            ))),
        }
    }

    fn mark_seen(&mut self, option: &'static str, meta: &ParseNestedMeta) -> SynResult<()> {
        if self.seen.insert(option) {
            Ok(())
        } else {
            Err(meta.error(format!("Duplicate option: `{option}`")))
        }
    }

    fn set_key(&mut self, lit: LitStr) -> SynResult<()> {
        if !self.seen.insert("key") {
            return Err(SynError::new_spanned(&lit, "Duplicate option: `key`"));
        }

        validate_key(&lit)?;
        self.key = Some(lit);
        Ok(())
    }

    /// Validates the accumulated options and builds the configuration.
    ///
    /// - `skip` cannot be combined with anything
    /// - `secret` requires a key
    /// - a non-skipped attribute must name a key
    fn build_config(self, attr: &Attribute) -> SynResult<FieldConfig> {
        if self.skip {
            let incompatible: Vec<&str> = [
                self.key.is_some().then_some("key"),
                self.secret.then_some("secret"),
            ]
            .into_iter()
            .flatten()
            .collect();

            if !incompatible.is_empty() {
                return Err(SynError::new_spanned(
                    attr,
                    format!("Cannot use `{}` with `skip`", incompatible.join("`, `")),
                ));
            }

            return Ok(FieldConfig::Skip);
        }

        let Some(key) = self.key else {
            let message = if self.secret {
                "`secret` requires `key = \"...\"`"
            } else {
                "Expected `key = \"...\"` or `skip`"
            };
            return Err(SynError::new_spanned(attr, message));
        };

        Ok(FieldConfig::Tagged(DotenvAttr {
            key,
            secret: self.secret,
        }))
    }
}

/// Rejects keys the document parser could never produce.
fn validate_key(lit: &LitStr) -> SynResult<()> {
    let key = lit.value();

    if key.is_empty() {
        return Err(SynError::new_spanned(lit, "Key must not be empty"));
    }

    if key.chars().any(|c| c.is_whitespace() || c == '=' || c == '#') {
        return Err(SynError::new_spanned(
            lit,
            format!("Invalid key `{key}`: keys cannot contain whitespace, `=` or `#`"),
        ));
    }

    Ok(())
}
