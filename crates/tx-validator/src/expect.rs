use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    Contains,
    Starts,
    Ends,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    Regex(String),
    Compare { op: CompareOp, operand: String },
    Text { op: TextOp, text: String },
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectError {
    Empty,
    EmptyPayload { prefix: String },
    NotANumber { prefix: String, payload: String },
}

fn number_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("number regex must compile"))
}

fn sole_placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\$\{[^}]+\}$").expect("placeholder regex must compile"))
}

const COMPARE_PREFIXES: [(&str, CompareOp); 6] = [
    ("GE", CompareOp::Ge),
    ("LE", CompareOp::Le),
    ("GT", CompareOp::Gt),
    ("LT", CompareOp::Lt),
    ("EQ", CompareOp::Eq),
    ("NE", CompareOp::Ne),
];

const TEXT_PREFIXES: [(&str, TextOp); 3] = [
    ("CONTAINS", TextOp::Contains),
    ("STARTS", TextOp::Starts),
    ("ENDS", TextOp::Ends),
];

pub fn parse_expect(raw: &str) -> Result<Expectation, ExpectError> {
    if raw.is_empty() {
        return Err(ExpectError::Empty);
    }
    let Some((prefix, payload)) = raw.split_once(':') else {
        return Ok(Expectation::Literal(raw.to_string()));
    };
    let upper = prefix.to_ascii_uppercase();

    if upper == "REGEX" {
        if payload.is_empty() {
            return Err(ExpectError::EmptyPayload {
                prefix: prefix.to_string(),
            });
        }
        return Ok(Expectation::Regex(payload.to_string()));
    }

    if let Some((_, op)) = COMPARE_PREFIXES.iter().find(|(name, _)| *name == upper) {
        if number_regex().is_match(payload) || sole_placeholder_regex().is_match(payload) {
            return Ok(Expectation::Compare {
                op: *op,
                operand: payload.to_string(),
            });
        }
        return Err(ExpectError::NotANumber {
            prefix: prefix.to_string(),
            payload: payload.to_string(),
        });
    }

    if let Some((_, op)) = TEXT_PREFIXES.iter().find(|(name, _)| *name == upper) {
        if payload.is_empty() {
            return Err(ExpectError::EmptyPayload {
                prefix: prefix.to_string(),
            });
        }
        return Ok(Expectation::Text {
            op: *op,
            text: payload.to_string(),
        });
    }

    Ok(Expectation::Literal(raw.to_string()))
}

pub fn is_valid_expect(raw: &str) -> bool {
    parse_expect(raw).is_ok()
}

#[cfg(test)]
mod expect_tests {
    use super::*;

    #[test]
    fn grammar_table_cases() {
        assert_eq!(
            parse_expect("REGEX:abc"),
            Ok(Expectation::Regex("abc".to_string()))
        );
        assert_eq!(
            parse_expect("GE:5"),
            Ok(Expectation::Compare {
                op: CompareOp::Ge,
                operand: "5".to_string()
            })
        );
        assert!(!is_valid_expect("GE:notanumber"));
        assert_eq!(
            parse_expect("CONTAINS:x"),
            Ok(Expectation::Text {
                op: TextOp::Contains,
                text: "x".to_string()
            })
        );
        assert_eq!(
            parse_expect("anything-else"),
            Ok(Expectation::Literal("anything-else".to_string()))
        );
    }

    #[test]
    fn numbers_may_be_signed_and_fractional() {
        for raw in ["LT:-1", "GT:+2", "EQ:3.25", "NE:0", "le:10"] {
            assert!(is_valid_expect(raw), "{raw} should be valid");
        }
        for raw in ["EQ:", "EQ:1.", "EQ:.5", "EQ:1e3", "NE:abc"] {
            assert!(!is_valid_expect(raw), "{raw} should be invalid");
        }
    }

    #[test]
    fn placeholder_operand_is_accepted() {
        assert!(is_valid_expect("LE:${MAX_LOSS}"));
        assert!(!is_valid_expect("LE:${MAX_LOSS}x"));
    }

    #[test]
    fn empty_payloads_and_empty_expect_are_invalid() {
        assert_eq!(parse_expect(""), Err(ExpectError::Empty));
        assert!(!is_valid_expect("REGEX:"));
        assert!(!is_valid_expect("starts:"));
        assert!(is_valid_expect("ENDS:done"));
        assert!(is_valid_expect("Contains:Ok"));
    }

    #[test]
    fn unknown_prefix_with_colon_is_literal() {
        assert_eq!(
            parse_expect("status: up"),
            Ok(Expectation::Literal("status: up".to_string()))
        );
    }
}
