use alloc::{string::ToString, vec, vec::Vec};

use rstest::rstest;

use crate::{Map, ScannerOptions, Value, parse, parse_multiple};

fn parse_default(input: &[u8]) -> Value {
    parse(input, ScannerOptions::default()).unwrap()
}

#[rstest]
#[case(b"42", Value::Int(42))]
#[case(b"-7", Value::Int(-7))]
#[case(b"-0", Value::Int(0))]
#[case(b"0", Value::Int(0))]
#[case(b"9223372036854775807", Value::Int(i64::MAX))]
#[case(b"-9223372036854775808", Value::Int(i64::MIN))]
#[case(b"3.5", Value::Double(3.5))]
#[case(b"1e3", Value::Double(1000.0))]
#[case(b"-2.5e-1", Value::Double(-0.25))]
#[case(b"true", Value::Bool(true))]
#[case(b"false", Value::Bool(false))]
#[case(b"null", Value::Null)]
#[case(b"\"\"", Value::String("".to_string()))]
#[case(b"\"hi\"", Value::String("hi".to_string()))]
fn top_level_scalars(#[case] input: &[u8], #[case] expected: Value) {
    assert_eq!(parse_default(input), expected);
}

#[rstest]
#[case(br#""A""#, "A")]
#[case(br#""\n\t\r\b\f""#, "\n\t\r\u{0008}\u{000C}")]
#[case(br#""\"\\\/""#, "\"\\/")]
#[case("\"😀\"".as_bytes(), "\u{1F600}")]
#[case("\"naïve\"".as_bytes(), "naïve")]
fn string_escapes(#[case] input: &[u8], #[case] expected: &str) {
    assert_eq!(parse_default(input), Value::String(expected.to_string()));
}

#[test]
fn nested_document() {
    let root = parse_default(br#"{"a": [1, 2, {"b": 3}], "c": null}"#);
    let mut inner = Map::new();
    inner.insert("b".to_string(), Value::Int(3));
    let mut expected = Map::new();
    expected.insert(
        "a".to_string(),
        Value::Array(vec![Value::Int(1), Value::Int(2), Value::Object(inner)]),
    );
    expected.insert("c".to_string(), Value::Null);
    assert_eq!(root, Value::Object(expected));
}

#[test]
fn empty_containers() {
    assert_eq!(parse_default(b"{}"), Value::Object(Map::new()));
    assert_eq!(parse_default(b"[]"), Value::Array(Vec::new()));
    assert_eq!(
        parse_default(b" [ { } , [ ] ] "),
        Value::Array(vec![Value::Object(Map::new()), Value::Array(Vec::new())])
    );
}

#[test]
fn duplicate_keys_last_write_wins() {
    let root = parse_default(br#"{"a": 1, "a": 2}"#);
    let mut expected = Map::new();
    expected.insert("a".to_string(), Value::Int(2));
    assert_eq!(root, Value::Object(expected));
}

#[test]
fn integer_overflow_falls_back_to_double() {
    assert_eq!(
        parse_default(b"9223372036854775808"),
        Value::Double(9_223_372_036_854_775_808.0)
    );
}

#[test]
fn invalid_utf8_decodes_lossily_by_default() {
    let root = parse(b"\"a\xFFb\"", ScannerOptions::default()).unwrap();
    assert_eq!(root, Value::String("a\u{FFFD}b".to_string()));
}

#[test]
fn trailing_input_is_ignored_when_allowed() {
    let options = ScannerOptions {
        allow_trailing_input: true,
        ..ScannerOptions::default()
    };
    assert_eq!(
        parse(b"[1] trailing garbage", options).unwrap(),
        Value::Array(vec![Value::Int(1)])
    );
}

#[test]
fn multiple_values_first_then_all() {
    let options = ScannerOptions {
        allow_multiple_values: true,
        ..ScannerOptions::default()
    };
    // `parse` consumes only the first document.
    assert_eq!(parse(b"{} [1] 2", options).unwrap(), Value::Object(Map::new()));

    let values = parse_multiple(b"{} [1] 2", ScannerOptions::default()).unwrap();
    assert_eq!(
        values,
        vec![
            Value::Object(Map::new()),
            Value::Array(vec![Value::Int(1)]),
            Value::Int(2),
        ]
    );
}

#[test]
fn parse_multiple_of_empty_input() {
    assert_eq!(parse_multiple(b"  ", ScannerOptions::default()).unwrap(), vec![]);
}

#[test]
fn partial_input_completes_open_frames() {
    let options = ScannerOptions {
        allow_partial_input: true,
        ..ScannerOptions::default()
    };

    let root = parse(br#"{"a": [1, 2"#, options).unwrap();
    let mut expected = Map::new();
    expected.insert("a".to_string(), Value::Array(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(root, Value::Object(expected));

    // A dangling pending key is dropped.
    assert_eq!(parse(br#"{"a":"#, options).unwrap(), Value::Object(Map::new()));

    // A complete document is unaffected by the option.
    assert_eq!(parse(b"[true]", options).unwrap(), Value::Array(vec![Value::Bool(true)]));
}

#[test]
fn comments_allowed_when_enabled() {
    let options = ScannerOptions {
        allow_comments: true,
        ..ScannerOptions::default()
    };
    // Comments count as whitespace everywhere, including after the value.
    let root = parse(b"// leading\n{\"a\": /* inline */ 1} // trailing\n", options).unwrap();
    let mut expected = Map::new();
    expected.insert("a".to_string(), Value::Int(1));
    assert_eq!(root, Value::Object(expected));
}
