//! Property-based tests for parser and mapper invariants.
//!
//! These tests check behaviour over generated documents rather than
//! hand-picked fixtures.

#![allow(clippy::pedantic)]

use proptest::prelude::*;

use dotfeed::{Record, decode_str, parse_str};

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,15}"
}

// ============================================================================
// Parser Properties
// ============================================================================

mod parser_properties {
    use super::*;

    proptest! {
        /// Parsing never panics, whatever the input
        #[test]
        fn parse_never_panics(s in "(?s).{0,200}") {
            let _ = parse_str(&s);
        }

        /// Unquoted values made of plain characters come back verbatim
        #[test]
        fn plain_value_preserved(
            key in key_strategy(),
            value in "[a-zA-Z0-9_./:@=-]{0,32}",
        ) {
            let entries = parse_str(&format!("{key}={value}\n")).unwrap();
            prop_assert_eq!(entries.get(&key), Some(value.as_str()));
        }

        /// Surrounding whitespace is trimmed from unquoted values and keys
        #[test]
        fn unquoted_value_trimmed(
            key in key_strategy(),
            value in "[a-z0-9]{1,16}",
            pad_key in "[ \t]{0,4}",
            pad_value in "[ \t]{0,4}",
        ) {
            let doc = format!("{pad_key}{key}{pad_key}={pad_value}{value}{pad_value}\n");
            let entries = parse_str(&doc).unwrap();
            prop_assert_eq!(entries.get(&key), Some(value.as_str()));
        }

        /// Double-quoted values keep their padding and any `#`
        #[test]
        fn quoted_value_preserved(
            key in key_strategy(),
            value in "[ a-z0-9#=']{0,32}",
        ) {
            let entries = parse_str(&format!("{key}=\"{value}\"\n")).unwrap();
            prop_assert_eq!(entries.get(&key), Some(value.as_str()));
        }

        /// A repeated key resolves to its last occurrence
        #[test]
        fn last_duplicate_wins(
            key in key_strategy(),
            first in "[a-z0-9]{1,16}",
            second in "[a-z0-9]{1,16}",
        ) {
            let doc = format!("{key}={first}\n# between\n{key}={second}\n");
            let entries = parse_str(&doc).unwrap();

            prop_assert_eq!(entries.len(), 1);
            prop_assert_eq!(entries.get(&key), Some(second.as_str()));
            prop_assert_eq!(entries.entry(&key).map(|e| e.line), Some(3));
        }

        /// Each entry remembers the line it was written on
        #[test]
        fn entry_lines_match_position(count in 1usize..20) {
            let doc: String = (0..count).map(|i| format!("KEY_{i}=v{i}\n")).collect();
            let entries = parse_str(&doc).unwrap();

            prop_assert_eq!(entries.len(), count);
            for i in 0..count {
                let entry = entries.entry(&format!("KEY_{i}")).unwrap();
                prop_assert_eq!(entry.line, i + 1);
            }
        }

        /// CRLF and LF documents parse to the same mapping
        #[test]
        fn crlf_matches_lf(
            pairs in prop::collection::btree_map(key_strategy(), "[a-z0-9 ]{0,12}", 0..8),
        ) {
            let lf: String = pairs.iter().map(|(k, v)| format!("{k}=\"{v}\"\n")).collect();
            let crlf = lf.replace('\n', "\r\n");

            let lf = parse_str(&lf).unwrap().into_map();
            let crlf = parse_str(&crlf).unwrap().into_map();
            prop_assert_eq!(lf, crlf);
        }
    }
}

// ============================================================================
// Mapping Properties
// ============================================================================

mod mapping_properties {
    use super::*;

    #[derive(Record, Debug, Default)]
    struct Numbers {
        #[dotenv("UNSIGNED")]
        unsigned: u64,
        #[dotenv("SIGNED")]
        signed: i64,
        #[dotenv("FLAG")]
        flag: bool,
        #[dotenv("LIST")]
        list: Vec<u32>,
    }

    #[derive(Record, Debug, Default)]
    struct Text {
        #[dotenv("TEXT")]
        text: String,
    }

    proptest! {
        /// Integers, booleans and lists survive the document round trip
        #[test]
        fn scalars_decode(
            unsigned in any::<u64>(),
            signed in any::<i64>(),
            flag in any::<bool>(),
            list in prop::collection::vec(any::<u32>(), 0..6),
        ) {
            let rendered: Vec<String> = list.iter().map(u32::to_string).collect();
            let doc = format!(
                "UNSIGNED={unsigned}\nSIGNED={signed}\nFLAG={flag}\nLIST={}\n",
                rendered.join(", ")
            );

            let mut numbers = Numbers::default();
            let report = decode_str(&doc, &mut numbers).unwrap();

            prop_assert_eq!(report.assigned.len(), 4);
            prop_assert_eq!(numbers.unsigned, unsigned);
            prop_assert_eq!(numbers.signed, signed);
            prop_assert_eq!(numbers.flag, flag);
            prop_assert_eq!(numbers.list, list);
        }

        /// Values outside the field's domain fail without touching it
        #[test]
        fn non_numeric_rejected(junk in "[a-z]{1,8}") {
            let mut numbers = Numbers { unsigned: 7, ..Numbers::default() };
            let result = decode_str(&format!("UNSIGNED={junk}\n"), &mut numbers);

            prop_assert!(result.is_err());
            prop_assert_eq!(numbers.unsigned, 7);
        }

        /// A rendered template parses back to the value it was rendered from
        #[test]
        fn template_round_trip(value in "[ a-zA-Z0-9#='\"`\\\\\r\n-]{0,32}") {
            // A quoted value cannot end in a backslash.
            prop_assume!(!value.ends_with('\\'));
            // Line endings are normalized on read.
            let expected = value.replace("\r\n", "\n");

            let mut source = Text { text: value.clone() };
            let template = dotfeed::example::render(&mut source).unwrap();

            let mut decoded = Text::default();
            decode_str(&template, &mut decoded).unwrap();
            prop_assert_eq!(decoded.text, expected);
        }
    }
}
