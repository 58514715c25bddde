//! `.env.example` template rendering.
//!
//! [`render`] walks a record the same way the mapper does and writes one
//! entry per tagged field, using the field's current value:
//!
//! ```text
//! # Generated by dotfeed
//!
//! # Application name (type: String)
//! APP_NAME=demo
//! # (secret, type: String)
//! API_TOKEN=
//! ```
//!
//! Feeding the template back into the same record yields the same values,
//! except for secrets, which are always written empty, and the two value
//! shapes [`quote_value`] cannot express.

use crate::error::Error;
use crate::record::{FieldKind, Record, Target};

const HEADER: &str = "# Generated by dotfeed";

/// Renders a template for `target` from its current field values.
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] if `target` is not a record.
pub fn render<T: Target + ?Sized>(target: &mut T) -> Result<String, Error> {
    let mut lines = vec![HEADER.to_string(), String::new()];

    let rendered =
        target.with_record(&mut |record: &mut dyn Record| render_record(record, &mut lines))?;

    if !rendered {
        return Err(Error::invalid_target(target.target_name()));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

fn render_record(record: &mut dyn Record, lines: &mut Vec<String>) -> Result<(), Error> {
    for field in record.fields() {
        match field.kind {
            FieldKind::Tagged(tag) => {
                let mut meta = Vec::new();
                if tag.secret {
                    meta.push("secret".to_string());
                }
                meta.push(format!("type: {}", tag.slot.expected_type()));

                let comment = match field.doc {
                    Some(doc) => format!("# {doc} ({})", meta.join(", ")),
                    None => format!("# ({})", meta.join(", ")),
                };
                lines.push(comment);

                let value = if tag.secret {
                    String::new()
                } else {
                    quote_value(&tag.slot.current())
                };
                lines.push(format!("{}={value}", tag.key));
            }

            FieldKind::Nested(target) => {
                // Leaves and empty pointers contribute nothing.
                target.with_record(&mut |record: &mut dyn Record| render_record(record, lines))?;
            }
        }
    }

    Ok(())
}

/// Writes `value` in a form the parser reads back unchanged.
///
/// Two shapes do not survive the trip:
///
/// - values ending in `\` that need quoting, since the backslash would
///   escape the closing quote;
/// - `\r\n` inside a value, which reads back as `\n` because the parser
///   drops the `\r` ending every physical line.
fn quote_value(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }

    format!("\"{}\"", value.replace('"', "\\\""))
}

fn needs_quotes(value: &str) -> bool {
    value.trim() != value
        || value.contains(['#', '\n', '\r'])
        || value.starts_with(['"', '\'', '`'])
}
