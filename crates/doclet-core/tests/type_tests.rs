use doclet_core::{DocError, DocParser, FieldType, ParseOptions, Type, parse_param_type, parse_type};
use serde_json::json;

fn record_keys(ty: &Type) -> Vec<&str> {
    match ty {
        Type::RecordType { fields } => fields.iter().map(|field| field.key.as_str()).collect(),
        other => panic!("expected a record, got {other:?}"),
    }
}

#[test]
fn numeric_record_keys_are_normalized() {
    assert_eq!(record_keys(&parse_type("{0x2:String}").unwrap()), vec!["2"]);
    assert_eq!(record_keys(&parse_type("{.2:String}").unwrap()), vec!["0.2"]);
    assert_eq!(record_keys(&parse_type("{100e200:String}").unwrap()), vec!["1e+202"]);
}

#[test]
fn nullable_prefix_and_suffix_serialize() {
    assert_eq!(
        serde_json::to_value(parse_type("string?").unwrap()).unwrap(),
        json!({
            "type": "NullableType",
            "prefix": false,
            "expression": { "type": "NameExpression", "name": "string" }
        })
    );
    assert_eq!(
        serde_json::to_value(parse_type("?string").unwrap()).unwrap(),
        json!({
            "type": "NullableType",
            "prefix": true,
            "expression": { "type": "NameExpression", "name": "string" }
        })
    );
}

#[test]
fn unions_are_flat() {
    match parse_type("string|number|Test").unwrap() {
        Type::UnionType { elements } => assert_eq!(elements.len(), 3),
        other => panic!("expected a union, got {other:?}"),
    }
}

#[test]
fn array_sugar_is_an_application() {
    assert_eq!(
        parse_type("String[]").unwrap(),
        parse_type("Array<String>").unwrap()
    );
}

#[test]
fn function_with_optional_named_param() {
    let ty = parse_type("function(a:b=)").unwrap();
    assert_eq!(
        serde_json::to_value(&ty).unwrap(),
        json!({
            "type": "FunctionType",
            "params": [{
                "type": "OptionalType",
                "expression": {
                    "type": "ParameterType",
                    "name": "a",
                    "expression": { "type": "NameExpression", "name": "b" }
                }
            }],
            "result": null
        })
    );
}

#[test]
fn record_serializes_field_types() {
    let ty = parse_type("{a: number}").unwrap();
    assert_eq!(
        ty,
        Type::RecordType {
            fields: vec![FieldType::new("a", Type::name("number"))]
        }
    );
    assert_eq!(
        serde_json::to_value(&ty).unwrap(),
        json!({
            "type": "RecordType",
            "fields": [{
                "type": "FieldType",
                "key": "a",
                "value": { "type": "NameExpression", "name": "number" }
            }]
        })
    );
}

#[test]
fn ast_deserializes_back() {
    let ty = parse_type("function(this:Window, ...number): ?Array<string>").unwrap();
    let json = serde_json::to_string(&ty).unwrap();
    let back: Type = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ty);
}

#[test]
fn optional_nullable_literal_needs_param_position() {
    assert!(parse_type("?=").is_err());
    assert!(parse_param_type("?=").is_ok());

    let parser = DocParser::new(ParseOptions::default());
    assert!(parser.parse_param_type("?=").is_ok());
    assert!(parser.parse_type("?=").is_err());
}

#[test]
fn errors_carry_diagnostic_codes() {
    use miette::Diagnostic;

    let err = parse_type("Array<string").unwrap_err();
    assert!(matches!(err, DocError::UnbalancedDelimiter { delimiter: '<', .. }));
    assert_eq!(
        err.code().map(|code| code.to_string()).as_deref(),
        Some("doclet::unbalanced_delimiter")
    );
}
