mod common;

use parsimony::prelude::*;
use parsimony::text::{any_char_except, digits, many_string, of_str, skip_whitespaces};
use parsimony::{parse_str, ParseResult, SourcePosition};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
enum Json {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

fn symbol(c: char) -> BoxedParser<char, char> {
    token(c).before(skip_whitespaces()).boxed()
}

fn number() -> BoxedParser<char, Json> {
    map2(optional(token('-')), digits(), |sign: Option<char>, digits: String| {
        let n: f64 = digits.parse().unwrap_or_default();
        Json::Number(if sign.is_some() { -n } else { n })
    })
    .labelled("number")
    .boxed()
}

fn string_literal() -> BoxedParser<char, String> {
    between(token('"'), many_string(any_char_except("\"")), token('"'))
        .labelled("string")
        .boxed()
}

fn array() -> BoxedParser<char, Json> {
    between(
        symbol('['),
        separated(recursive(json_value), symbol(',')),
        symbol(']'),
    )
    .map(Json::Array)
    .boxed()
}

fn object() -> BoxedParser<char, Json> {
    let member = map3(
        string_literal().before(skip_whitespaces()),
        symbol(':'),
        recursive(json_value),
        |key: String, _, value: Json| (key, value),
    );

    between(symbol('{'), separated(member, symbol(',')), symbol('}'))
        .map(Json::Object)
        .boxed()
}

fn json_value() -> BoxedParser<char, Json> {
    one_of(vec![
        of_str("null").map(|_| Json::Null).boxed(),
        of_str("true").map(|_| Json::Bool(true)).boxed(),
        of_str("false").map(|_| Json::Bool(false)).boxed(),
        number(),
        string_literal().map(Json::Str).boxed(),
        array(),
        object(),
    ])
    .before(skip_whitespaces())
    .labelled("value")
    .boxed()
}

fn document() -> BoxedParser<char, Json> {
    between(skip_whitespaces(), json_value(), end()).boxed()
}

fn parse(input: &str) -> ParseResult<char, Json> {
    parse_str(input).run(&document()).unwrap()
}

#[test]
fn test_array_of_numbers() {
    let result = parse("[1,2,3]");

    assert!(result.is_successful());
    assert_eq!(
        *result.value(),
        Json::Array(vec![Json::Number(1.0), Json::Number(2.0), Json::Number(3.0)])
    );
}

#[test]
fn test_missing_element_after_trailing_comma() {
    let result = parse("[1,2,");

    assert!(!result.is_successful());
    assert!(result.has_consumed_input());
    assert!(result.error().cause.is_eof);
    assert_eq!(result.error().position(), SourcePosition::new(1, 6));

    let report = result.error().to_string();
    assert!(report.contains("Unexpected: EOF"), "{report}");
    assert!(report.ends_with("at line 1, column 6"), "{report}");
}

#[test]
fn test_empty_object() {
    assert_eq!(*parse("{}").value(), Json::Object(vec![]));
}

#[test]
fn test_nested_document() {
    let result = parse(r#" { "a" : [1, -20, {"b": null}], "c": true , "d": "x y" } "#);

    assert_eq!(
        *result.value(),
        Json::Object(vec![
            (
                "a".to_string(),
                Json::Array(vec![
                    Json::Number(1.0),
                    Json::Number(-20.0),
                    Json::Object(vec![("b".to_string(), Json::Null)]),
                ])
            ),
            ("c".to_string(), Json::Bool(true)),
            ("d".to_string(), Json::Str("x y".to_string())),
        ])
    );
}

#[test]
fn test_missing_separator_is_reported_at_the_element() {
    let result = parse("[1 2]");

    assert!(!result.is_successful());
    assert!(result.has_consumed_input());
    assert_eq!(result.error().cause.unexpected, Some('2'));
    assert_eq!(result.error().position(), SourcePosition::new(1, 4));
}

#[test]
fn test_trailing_content_is_rejected() {
    let result = parse("null x");

    assert!(!result.is_successful());
    assert_eq!(result.error().cause.unexpected, Some('x'));
    assert_eq!(
        result.error().message,
        "Expected the state to have ended but found more content."
    );
}

#[test]
fn test_unknown_value_lists_alternatives() {
    let result = parse("?");

    assert!(!result.is_successful());
    assert!(!result.has_consumed_input());
    let report = result.error().to_string();
    assert!(report.contains("<\"value\">"), "{report}");
    assert!(report.contains("<n, u, l, l>"), "{report}");
    assert!(report.contains("<\"number\">"), "{report}");
}

#[test]
fn test_grammar_is_reusable_across_parses() {
    let grammar = document();

    for (input, expected) in [("true", Json::Bool(true)), ("[]", Json::Array(vec![]))] {
        let result = parse_str(input).run(&grammar).unwrap();
        assert_eq!(*result.value(), expected);
    }
}
