use doclet_core::{
    DocError, DocParser, ExampleKind, ParseOptions, Type, parse_comment, strip_stars, tokenize,
};
use serde_json::json;

fn parse(text: &str) -> doclet_core::Comment {
    parse_comment(text, &ParseOptions::default()).expect("comment should parse")
}

#[test]
fn unwraps_multiline_param() {
    let comment = parse("/**\n * @param {String} userName\n*/");

    assert_eq!(comment.tags.len(), 1);
    let tag = serde_json::to_value(&comment.tags[0]).unwrap();
    assert_eq!(tag["title"], "param");
    assert_eq!(tag["name"], "userName");
    assert_eq!(tag["type"], json!({ "type": "NameExpression", "name": "String" }));
}

#[test]
fn strips_hyphen_before_description() {
    let comment = parse("/** @param {string} name - description */");

    let tag = &comment.tags[0];
    assert_eq!(tag.title, "param");
    assert_eq!(tag.name.as_deref(), Some("name"));
    assert_eq!(tag.description.as_deref(), Some("description"));
    assert_eq!(tag.single_type(), Some(&Type::name("string")));
}

#[test]
fn drops_tag_with_forbidden_type() {
    let comment = parse("/** @method {Object} thingName.function */");
    assert!(comment.tags.is_empty());
}

#[test]
fn multiline_type_keeps_embedded_newline() {
    let body = strip_stars("/**\n * @param {{\n *   a: string\n * }} opts the options\n */", false)
        .unwrap();
    let token = tokenize(&body);
    assert_eq!(token.tags.len(), 1);
    assert!(token.tags[0].raw.contains("{{\n"), "raw was {:?}", token.tags[0].raw);

    let comment = parse("/**\n * @param {{\n *   a: string\n * }} opts the options\n */");
    let tag = &comment.tags[0];
    assert_eq!(tag.name.as_deref(), Some("opts"));
    assert_eq!(tag.description.as_deref(), Some("the options"));
    match tag.single_type() {
        Some(Type::RecordType { fields }) => assert_eq!(fields[0].key, "a"),
        other => panic!("expected record type, got {other:?}"),
    }
}

#[test]
fn plain_continuation_lines_join_with_space() {
    let comment = parse("/**\n * @param {number} count how many\n *   items to take\n */");
    assert_eq!(
        comment.tags[0].description.as_deref(),
        Some("how many items to take")
    );
}

#[test]
fn full_comment() {
    let comment = parse(
        r#"/**
 * Fetch a resource.
 *
 * Retries on failure.
 *
 * @async
 * @param {string} url - where to go
 * @param {Object} [options={}] request options
 * @param {number=} options.retries
 * @returns {Promise<Response>} the response
 * @throws {TypeError} {RangeError} on bad input
 * @example <caption>Basic</caption>
 * await fetchIt("/a");
 * @since 1.2.0
 * @see {@link other}
 */"#,
    );

    assert_eq!(comment.description, "Fetch a resource.\nRetries on failure.");
    let titles: Vec<_> = comment.tags.iter().map(|tag| tag.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["async", "param", "param", "param", "returns", "throws", "since", "see"]
    );

    let options = &comment.tags[2];
    assert!(options.optional);
    assert_eq!(options.default.as_deref(), Some("{}"));

    let retries = &comment.tags[3];
    assert_eq!(retries.name.as_deref(), Some("options.retries"));
    assert!(retries.optional);

    let returns = &comment.tags[4];
    assert_eq!(
        returns.single_type().map(ToString::to_string).as_deref(),
        Some("Promise<Response>")
    );

    let throws = &comment.tags[5];
    assert_eq!(throws.ty.as_ref().map(|ty| ty.types().len()), Some(2));

    assert_eq!(comment.tags[7].description.as_deref(), Some("{@link other}"));

    assert_eq!(comment.examples.len(), 1);
    assert_eq!(comment.examples[0].kind, ExampleKind::Javadoc);
    assert_eq!(comment.examples[0].description, "Basic");
    assert_eq!(comment.examples[0].value, "await fetchIt(\"/a\");");
}

#[test]
fn fenced_examples_are_collected() {
    let comment = parse("/**\n * Demo.\n *\n * ```js\n * run();\n * ```\n */");
    assert_eq!(comment.description, "Demo.");
    assert_eq!(comment.examples.len(), 1);
    assert_eq!(comment.examples[0].kind, ExampleKind::Gfm);
    assert_eq!(comment.examples[0].language, "js");
    assert_eq!(comment.examples[0].value, "run();");
}

#[test]
fn unbalanced_type_fails_unless_recoverable() {
    let text = "/**\n * @param {Array<string} list\n * @returns {number}\n */";

    let err = parse_comment(text, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, DocError::UnbalancedDelimiter { .. }), "got {err:?}");

    let options = ParseOptions::builder().recoverable(true).build();
    let comment = parse_comment(text, &options).unwrap();
    assert_eq!(comment.tags.len(), 2);
    assert!(!comment.tags[0].errors.is_empty());
    assert!(comment.tags[1].errors.is_empty());
    assert!(comment.has_errors());
}

#[test]
fn semantic_errors_never_fail_the_parse() {
    let comment = parse("/**\n * @access secret\n * @kind thing\n * @variation x\n */");
    assert_eq!(comment.tags.len(), 3);
    assert!(comment.tags.iter().all(|tag| !tag.errors.is_empty()));
}

#[test]
fn strict_mode_checks() {
    let options = ParseOptions::builder().strict(true).recoverable(true).build();
    let comment = parse_comment(
        "/**\n * @static always\n * @param {string}\n * @param {string} [opt]\n */",
        &options,
    )
    .unwrap();

    assert!(!comment.tags[0].errors.is_empty());
    assert!(comment.tags[1].name.is_none());
    assert!(!comment.tags[1].errors.is_empty());
    assert!(!comment.tags[2].errors.is_empty());

    let sloppy = ParseOptions::builder().strict(true).sloppy(true).build();
    let comment = parse_comment("/** @param {string} [opt] */", &sloppy).unwrap();
    assert!(comment.tags[0].errors.is_empty());
    assert!(comment.tags[0].optional);
}

#[test]
fn missing_name_is_tolerated_outside_strict_mode() {
    let comment = parse("/** @param {string} */");
    assert_eq!(comment.tags.len(), 1);
    assert!(comment.tags[0].name.is_none());

    let strict = ParseOptions::builder().strict(true).build();
    let comment = parse_comment("/** @param {string} */", &strict).unwrap();
    assert!(comment.tags.is_empty());
}

#[test]
fn allow_list_filters_by_canonical_title() {
    let options = ParseOptions::builder().tags(vec!["return".to_string()]).build();
    let comment = parse_comment("/**\n * @param a\n * @return {x}\n */", &options).unwrap();
    assert_eq!(comment.tags.len(), 1);
    assert_eq!(comment.tags[0].title, "returns");
}

#[test]
fn single_star_comments() {
    assert!(parse_comment("/* @param a */", &ParseOptions::default()).is_err());

    let options = ParseOptions::builder().allow_single_star(true).build();
    let comment = parse_comment("/* @param a */", &options).unwrap();
    assert_eq!(comment.tags[0].name.as_deref(), Some("a"));
}

#[test]
fn source_files_yield_located_comments() {
    let source = r#"
/**
 * Point in space.
 * @typedef {Object} Point
 * @property {number} x
 */

/** @type {Point} */
export const origin = { x: 0 };
"#;

    let options = ParseOptions::builder().line_numbers(true).build();
    let parser = DocParser::new(options);
    let comments = parser.parse_many_comments(source).unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].start_line, Some(2));
    assert_eq!(comments[0].end_line, Some(6));
    assert_eq!(comments[0].tags[0].title, "typedef");
    assert_eq!(comments[0].tags[0].name.as_deref(), Some("Point"));
    assert_eq!(comments[0].tags[0].line, Some(4));
    assert_eq!(comments[0].tags[1].title, "prop");

    let grouped = parser.group_tags(&comments[0]);
    assert!(grouped.contains_key("typedefs"));
    assert!(grouped.contains_key("props"));

    assert_eq!(comments[1].tags[0].single_type(), Some(&Type::name("Point")));
}
