use rstest::rstest;

use crate::{
    DocumentBuilder, Error, Scanner, ScannerOptions, SyntaxError, parse,
};

fn parse_err(input: &[u8]) -> SyntaxError {
    parse_err_with(input, ScannerOptions::default())
}

fn parse_err_with(input: &[u8], options: ScannerOptions) -> SyntaxError {
    match parse(input, options) {
        Err(Error::MalformedInput { kind, .. }) => kind,
        other => panic!("expected malformed input, got {other:?}"),
    }
}

#[rstest]
#[case(b"", SyntaxError::UnexpectedEndOfInput)]
#[case(b"   ", SyntaxError::UnexpectedEndOfInput)]
#[case(b"{", SyntaxError::UnexpectedEndOfInput)]
#[case(b"[1", SyntaxError::UnexpectedEndOfInput)]
#[case(b"\"abc", SyntaxError::UnexpectedEndOfInput)]
#[case(b"tru", SyntaxError::UnexpectedEndOfInput)]
#[case(b"1.", SyntaxError::UnexpectedEndOfInput)]
#[case(b"1e+", SyntaxError::UnexpectedEndOfInput)]
#[case(b"-", SyntaxError::UnexpectedEndOfInput)]
#[case(br#"{"a":}"#, SyntaxError::InvalidCharacter('}'))]
#[case(b"[1,]", SyntaxError::InvalidCharacter(']'))]
#[case(b"[}", SyntaxError::InvalidCharacter('}'))]
#[case(b"{]", SyntaxError::InvalidCharacter(']'))]
#[case(br#"{"a" 1}"#, SyntaxError::InvalidCharacter('1'))]
#[case(br#"{"a":1 "b":2}"#, SyntaxError::InvalidCharacter('"'))]
#[case(b"truX", SyntaxError::InvalidCharacter('t'))]
#[case(b"1.x", SyntaxError::InvalidCharacter('x'))]
#[case(b"-x", SyntaxError::InvalidCharacter('x'))]
#[case(b"01", SyntaxError::LeadingZero)]
#[case(b"-012", SyntaxError::LeadingZero)]
#[case(b"1e999", SyntaxError::NumberOutOfRange)]
#[case(b"42 43", SyntaxError::TrailingCharacters)]
#[case(b"// comment\n1", SyntaxError::InvalidCharacter('/'))]
#[case(br#""\q""#, SyntaxError::InvalidEscape('q'))]
#[case(br#""\u12G4""#, SyntaxError::InvalidUnicodeEscapeChar('G'))]
#[case(br#""\uD800""#, SyntaxError::LoneSurrogate(0xD800))]
#[case(br#""\uD800\uD800""#, SyntaxError::LoneSurrogate(0xD800))]
#[case(br#""\uDC00""#, SyntaxError::LoneSurrogate(0xDC00))]
#[case(b"\"a\nb\"", SyntaxError::InvalidCharacter('\n'))]
fn malformed_inputs(#[case] input: &[u8], #[case] expected: SyntaxError) {
    assert_eq!(parse_err(input), expected);
}

#[test]
fn missing_value_reports_position() {
    assert_eq!(
        parse(br#"{"a":}"#, ScannerOptions::default()),
        Err(Error::MalformedInput {
            kind: SyntaxError::InvalidCharacter('}'),
            line: 1,
            column: 6,
        })
    );
}

#[test]
fn unterminated_comment() {
    let options = ScannerOptions {
        allow_comments: true,
        ..ScannerOptions::default()
    };
    assert_eq!(
        parse_err_with(b"/* never closed", options),
        SyntaxError::UnterminatedComment
    );
}

#[test]
fn invalid_utf8_is_an_error_when_validating() {
    let options = ScannerOptions {
        validate_utf8: true,
        ..ScannerOptions::default()
    };
    assert_eq!(parse_err_with(b"\"a\xFFb\"", options), SyntaxError::InvalidUtf8);
}

#[test]
fn strict_integer_overflow() {
    let options = ScannerOptions {
        strict_integers: true,
        ..ScannerOptions::default()
    };
    assert_eq!(
        parse(b"[18446744073709551615]", options),
        Err(Error::NumericOverflow)
    );
}

#[test]
fn scanner_error_surfaces_through_builder_status() {
    let mut scanner = Scanner::new(br#"{"a":}"#, ScannerOptions::default());
    let mut builder = DocumentBuilder::new();

    let err = builder.consume(&mut scanner).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));

    // The failure is recorded and the partial root is never exposed.
    assert_eq!(builder.status().error(), Some(&err));
    assert!(!builder.is_complete());
    assert_eq!(builder.root(), None);
    assert_eq!(builder.into_root(), None);
}

#[test]
fn builder_stops_after_failure() {
    let mut scanner = Scanner::new(b"[1,]", ScannerOptions::default());
    let mut builder = DocumentBuilder::new();
    let err = builder.consume(&mut scanner).unwrap_err();

    // Further events are refused with the original error.
    assert_eq!(builder.apply(crate::Event::Null), Err(err));
}

#[test]
fn partial_input_does_not_mask_real_errors() {
    let options = ScannerOptions {
        allow_partial_input: true,
        ..ScannerOptions::default()
    };
    assert_eq!(
        parse_err_with(br#"{"a":x"#, options),
        SyntaxError::InvalidCharacter('x')
    );
}

#[test]
fn empty_input_with_partial_option_has_no_root() {
    let options = ScannerOptions {
        allow_partial_input: true,
        ..ScannerOptions::default()
    };
    assert_eq!(parse_err_with(b"", options), SyntaxError::UnexpectedEndOfInput);
}
