//! Property-based tests for the type expression parser.

use doclet_core::{DocError, FieldType, Type, parse_type};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "((module|event|external):)?[A-Z][a-zA-Z0-9_]{0,6}(\\.[a-z]{1,4})?"
}

fn leaf_strategy() -> impl Strategy<Value = Type> {
    prop_oneof![
        4 => name_strategy().prop_map(Type::name),
        1 => Just(Type::AllLiteral),
        1 => (0u32..1000).prop_map(|n| Type::NumericLiteralType { value: f64::from(n) }),
        1 => "[a-z ]{0,6}".prop_map(|value| Type::StringLiteralType { value }),
        1 => any::<bool>().prop_map(|value| Type::BooleanLiteralType { value }),
        1 => name_strategy().prop_map(|name| Type::nullable(Type::name(name), true)),
    ]
}

fn type_strategy() -> impl Strategy<Value = Type> {
    leaf_strategy().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Type::union),
            (name_strategy(), prop::collection::vec(inner.clone(), 1..3))
                .prop_map(|(name, args)| Type::application(Type::name(name), args)),
            prop::collection::vec(("[a-z]{1,5}", inner.clone()), 0..3).prop_map(|fields| {
                Type::RecordType {
                    fields: fields
                        .into_iter()
                        .map(|(key, value)| FieldType::new(key, value))
                        .collect(),
                }
            }),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|elements| Type::ArrayType { elements }),
            (
                prop::collection::vec(inner.clone(), 0..3),
                prop::option::of(inner.clone())
            )
                .prop_map(|(params, result)| Type::FunctionType {
                    params,
                    result: result.map(Box::new),
                    this: None,
                    new: None,
                }),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: serializing a parsed type and parsing it again is stable.
    #[test]
    fn prop_serializer_round_trip(ty in type_strategy()) {
        let text = ty.to_string();
        let parsed = parse_type(&text);
        prop_assert!(parsed.is_ok(), "{text:?} failed to parse: {parsed:?}");
        let parsed = parsed.unwrap();

        let again = parsed.to_string();
        let reparsed = parse_type(&again);
        prop_assert_eq!(reparsed, Ok(parsed), "unstable round trip of {}", text);
    }

    /// Property: a trailing opener that is never closed is reported as unbalanced.
    #[test]
    fn prop_trailing_opener_is_unbalanced(
        ty in type_strategy(),
        opener in prop::sample::select(vec!['{', '[', '(', '<']),
    ) {
        let text = format!("{ty}{opener}");
        let result = parse_type(&text);
        prop_assert!(
            matches!(result, Err(DocError::UnbalancedDelimiter { .. })),
            "{text:?} gave {result:?}"
        );
    }
}
