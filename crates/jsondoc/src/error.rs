use thiserror::Error;

/// A lexical or structural defect in the input bytes.
///
/// Each kind carries a stable numeric code (see [`SyntaxError::code`]) so
/// that callers bridging to other languages can report errors without
/// matching on the Rust enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid character '{0}' in unicode escape sequence")]
    InvalidUnicodeEscapeChar(char),
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscapeSequence(u32),
    #[error("unpaired surrogate \\u{0:04X} in string")]
    LoneSurrogate(u32),
    #[error("invalid UTF-8 in string content")]
    InvalidUtf8,
    #[error("numbers must not have leading zeroes")]
    LeadingZero,
    #[error("malformed number")]
    MalformedNumber,
    #[error("numeric value out of range")]
    NumberOutOfRange,
    #[error("trailing characters after top-level value")]
    TrailingCharacters,
}

impl SyntaxError {
    /// Stable numeric code for this error kind.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidCharacter(_) => 1,
            Self::UnexpectedEndOfInput => 2,
            Self::UnterminatedComment => 3,
            Self::InvalidEscape(_) => 4,
            Self::InvalidUnicodeEscapeChar(_) => 5,
            Self::InvalidUnicodeEscapeSequence(_) => 6,
            Self::LoneSurrogate(_) => 7,
            Self::InvalidUtf8 => 8,
            Self::LeadingZero => 9,
            Self::MalformedNumber => 10,
            Self::NumberOutOfRange => 11,
            Self::TrailingCharacters => 12,
        }
    }
}

/// The single error type surfaced by every fallible operation in this crate.
///
/// Scanner failures are wrapped in [`Error::MalformedInput`] together with
/// the 1-based line and byte column at which scanning stopped. Builder
/// protocol violations are unrecoverable for the parse that produced them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Resource exhaustion while setting up parser state. Never produced by
    /// the pure-Rust paths; retained for parity with foreign-engine
    /// bindings that can fail allocation during setup.
    #[error("failed to allocate parser state")]
    AllocationFailure,

    /// The input bytes are not well-formed JSON.
    #[error("malformed input (code {}) at line {line}, column {column}: {kind}", .kind.code())]
    MalformedInput {
        kind: SyntaxError,
        line: usize,
        column: usize,
    },

    /// The event stream violated the well-nesting contract, for example an
    /// end event with no matching start, or an event delivered after the
    /// document completed.
    #[error("event protocol violation: {0}")]
    BuilderProtocolViolation(&'static str),

    /// The value handed to the serializer contains a leaf that has no JSON
    /// representation, such as a NaN or infinite number.
    #[error("invalid serialization input: {0}")]
    InvalidSerializationInput(&'static str),

    /// An integer does not fit in 64 signed bits.
    #[error("integer does not fit in 64 bits")]
    NumericOverflow,
}

impl Error {
    pub(crate) fn malformed(kind: SyntaxError, line: usize, column: usize) -> Self {
        Self::MalformedInput { kind, line, column }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Error, SyntaxError};

    #[test]
    fn malformed_display_includes_code_and_position() {
        let err = Error::malformed(SyntaxError::InvalidCharacter('}'), 1, 7);
        assert_eq!(
            err.to_string(),
            "malformed input (code 1) at line 1, column 7: invalid character '}'"
        );
    }

    #[test]
    fn codes_are_distinct() {
        let kinds = [
            SyntaxError::InvalidCharacter('x'),
            SyntaxError::UnexpectedEndOfInput,
            SyntaxError::UnterminatedComment,
            SyntaxError::InvalidEscape('q'),
            SyntaxError::InvalidUnicodeEscapeChar('g'),
            SyntaxError::InvalidUnicodeEscapeSequence(0xD800),
            SyntaxError::LoneSurrogate(0xD800),
            SyntaxError::InvalidUtf8,
            SyntaxError::LeadingZero,
            SyntaxError::MalformedNumber,
            SyntaxError::NumberOutOfRange,
            SyntaxError::TrailingCharacters,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }
}
