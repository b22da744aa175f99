use proptest::prelude::*;
use tx_validator::{is_valid_expect, parse_expect, CompareOp, Expectation};

const COMPARE: [(&str, CompareOp); 6] = [
    ("GE", CompareOp::Ge),
    ("le", CompareOp::Le),
    ("Gt", CompareOp::Gt),
    ("LT", CompareOp::Lt),
    ("eq", CompareOp::Eq),
    ("NE", CompareOp::Ne),
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn numeric_operands_parse_for_every_comparison(
        index in 0usize..COMPARE.len(),
        number in "[+-]?[0-9]{1,6}(\\.[0-9]{1,3})?",
    ) {
        let (prefix, op) = COMPARE[index];
        let parsed = parse_expect(&format!("{prefix}:{number}"));
        prop_assert_eq!(parsed, Ok(Expectation::Compare { op, operand: number }));
    }

    #[test]
    fn alphabetic_operands_never_compare(
        index in 0usize..COMPARE.len(),
        word in "[a-zA-Z]{1,8}",
    ) {
        let (prefix, _) = COMPARE[index];
        let expr = format!("{prefix}:{word}");
        prop_assert!(!is_valid_expect(&expr));
    }

    #[test]
    fn text_without_colon_is_literal(text in "[a-zA-Z0-9 %._-]{1,24}") {
        prop_assert_eq!(parse_expect(&text), Ok(Expectation::Literal(text.clone())));
    }

    #[test]
    fn arbitrary_input_never_panics(raw in "\\PC{0,32}") {
        let _ = parse_expect(&raw);
    }
}
