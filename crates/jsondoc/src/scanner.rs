//! Pull tokenizer turning raw bytes into the primitive event stream.
//!
//! [`Scanner`] owns the structural state machine (what token is legal next,
//! which containers are open) and guarantees that the [`Event`]s it hands
//! out are well nested. Everything downstream — the document builder — can
//! therefore treat a nesting violation as a broken producer rather than
//! malformed input.

use alloc::{string::String, vec::Vec};

use crate::{
    error::{Error, SyntaxError},
    event::Event,
};

/// Configuration options for the [`Scanner`].
///
/// # Default
///
/// All options default to `false`: strict JSON, one top-level value, the
/// whole input consumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScannerOptions {
    /// Whether JavaScript-style comments (`// …` and `/* … */`) are treated
    /// as whitespace.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether invalid UTF-8 inside string content is an error.
    ///
    /// When `false`, invalid sequences decode lossily to U+FFFD, which is
    /// cheaper when the input is known to be clean.
    ///
    /// # Default
    ///
    /// `false`
    pub validate_utf8: bool,

    /// Whether bytes after one complete top-level value are ignored.
    ///
    /// Useful when a JSON document is embedded in a larger stream. Without
    /// this, trailing non-whitespace input is an error.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_input: bool,

    /// Whether multiple whitespace-separated top-level values may be
    /// scanned from one input, as in JSON Lines or arbitrary concatenation.
    ///
    /// # Examples
    ///
    /// ```json
    /// {}{}{}
    /// ```
    ///
    /// ```json
    /// 123 45 678 9
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_values: bool,

    /// Whether end-of-input in the middle of a value counts as clean
    /// termination instead of an error.
    ///
    /// The scanner simply stops; completing the truncated document is the
    /// caller's decision (see
    /// [`DocumentBuilder::finish_partial`](crate::DocumentBuilder::finish_partial)).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_partial_input: bool,

    /// Whether an integer literal that does not fit 64 signed bits is an
    /// error ([`Error::NumericOverflow`]).
    ///
    /// When `false`, such literals fall back to a lossy double.
    ///
    /// # Default
    ///
    /// `false`
    pub strict_integers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a value.
    Value,
    /// Just opened an object: expecting a key or `}`.
    ObjectFirst,
    /// Just opened an array: expecting a value or `]`.
    ArrayFirst,
    /// After a comma in an object: expecting a key.
    ObjectKey,
    /// After a key: expecting `:`.
    ObjectColon,
    /// A value just finished; expecting `,`, a closer, or the stream
    /// boundary when no container is open.
    After,
}

/// A pull scanner over a complete byte input.
///
/// Call [`next_event`](Scanner::next_event) until it returns `Ok(None)`
/// (clean end of input) or an error. Position counters are 1-based; the
/// column counts bytes within the line.
#[derive(Debug)]
pub struct Scanner<'src> {
    input: &'src [u8],
    pos: usize,
    line: usize,
    column: usize,
    options: ScannerOptions,
    scopes: Vec<Scope>,
    state: State,
}

impl<'src> Scanner<'src> {
    #[must_use]
    pub fn new(input: &'src [u8], options: ScannerOptions) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            options,
            scopes: Vec::new(),
            state: State::Value,
        }
    }

    /// The options this scanner was created with.
    #[must_use]
    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    /// Current 1-based (line, column) position.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Produces the next event, `Ok(None)` at clean end of input.
    ///
    /// With [`allow_partial_input`](ScannerOptions::allow_partial_input)
    /// set, end-of-input in the middle of a value is also reported as
    /// `Ok(None)`.
    pub fn next_event(&mut self) -> Result<Option<Event>, Error> {
        match self.next_event_inner() {
            Err(Error::MalformedInput {
                kind: SyntaxError::UnexpectedEndOfInput,
                ..
            }) if self.options.allow_partial_input => Ok(None),
            other => other,
        }
    }

    fn next_event_inner(&mut self) -> Result<Option<Event>, Error> {
        loop {
            self.skip_whitespace()?;
            match self.state {
                State::Value => return self.scan_value(),
                State::ObjectFirst => {
                    let Some(b) = self.peek() else {
                        return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
                    };
                    return match b {
                        b'}' => {
                            self.bump();
                            self.scopes.pop();
                            self.state = State::After;
                            Ok(Some(Event::MapEnd))
                        }
                        b'"' => self.scan_key(),
                        _ => Err(self.invalid_char_here()),
                    };
                }
                State::ArrayFirst => {
                    let Some(b) = self.peek() else {
                        return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
                    };
                    if b == b']' {
                        self.bump();
                        self.scopes.pop();
                        self.state = State::After;
                        return Ok(Some(Event::ArrayEnd));
                    }
                    self.state = State::Value;
                }
                State::ObjectKey => {
                    let Some(b) = self.peek() else {
                        return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
                    };
                    return match b {
                        b'"' => self.scan_key(),
                        _ => Err(self.invalid_char_here()),
                    };
                }
                State::ObjectColon => {
                    let Some(b) = self.peek() else {
                        return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
                    };
                    if b != b':' {
                        return Err(self.invalid_char_here());
                    }
                    self.bump();
                    self.state = State::Value;
                }
                State::After => {
                    if self.scopes.is_empty() {
                        // One complete top-level value has been delivered.
                        if self.peek().is_none() {
                            return Ok(None);
                        }
                        if self.options.allow_multiple_values {
                            self.state = State::Value;
                            continue;
                        }
                        if self.options.allow_trailing_input {
                            return Ok(None);
                        }
                        return Err(self.err_here(SyntaxError::TrailingCharacters));
                    }
                    let Some(b) = self.peek() else {
                        return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
                    };
                    match (self.scopes.last().copied(), b) {
                        (Some(Scope::Object), b',') => {
                            self.bump();
                            self.state = State::ObjectKey;
                        }
                        (Some(Scope::Object), b'}') => {
                            self.bump();
                            self.scopes.pop();
                            return Ok(Some(Event::MapEnd));
                        }
                        (Some(Scope::Array), b',') => {
                            self.bump();
                            self.state = State::Value;
                        }
                        (Some(Scope::Array), b']') => {
                            self.bump();
                            self.scopes.pop();
                            return Ok(Some(Event::ArrayEnd));
                        }
                        _ => return Err(self.invalid_char_here()),
                    }
                }
            }
        }
    }

    fn scan_value(&mut self) -> Result<Option<Event>, Error> {
        let Some(b) = self.peek() else {
            // Between top-level documents, end of input is a clean stop.
            if self.options.allow_multiple_values && self.scopes.is_empty() {
                return Ok(None);
            }
            return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
        };
        match b {
            b'{' => {
                self.bump();
                self.scopes.push(Scope::Object);
                self.state = State::ObjectFirst;
                Ok(Some(Event::MapStart))
            }
            b'[' => {
                self.bump();
                self.scopes.push(Scope::Array);
                self.state = State::ArrayFirst;
                Ok(Some(Event::ArrayStart))
            }
            b'"' => {
                self.bump();
                let s = self.scan_string()?;
                self.state = State::After;
                Ok(Some(Event::String(s)))
            }
            b't' => {
                self.expect_keyword(b"true")?;
                self.state = State::After;
                Ok(Some(Event::Bool(true)))
            }
            b'f' => {
                self.expect_keyword(b"false")?;
                self.state = State::After;
                Ok(Some(Event::Bool(false)))
            }
            b'n' => {
                self.expect_keyword(b"null")?;
                self.state = State::After;
                Ok(Some(Event::Null))
            }
            b'-' | b'0'..=b'9' => {
                let ev = self.scan_number()?;
                self.state = State::After;
                Ok(Some(ev))
            }
            _ => Err(self.invalid_char_here()),
        }
    }

    fn scan_key(&mut self) -> Result<Option<Event>, Error> {
        self.bump();
        let key = self.scan_string()?;
        self.state = State::ObjectColon;
        Ok(Some(Event::MapKey(key)))
    }

    // ── lexing ───────────────────────────────────────────────────────────

    /// Scans a string literal; the opening quote is already consumed.
    fn scan_string(&mut self) -> Result<String, Error> {
        let mut out = String::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
            };
            match b {
                b'"' => {
                    self.bump();
                    return Ok(out);
                }
                b'\\' => {
                    self.bump();
                    self.scan_escape(&mut out)?;
                }
                0x00..=0x1F => {
                    return Err(self.err_here(SyntaxError::InvalidCharacter(char::from(b))));
                }
                _ if b < 0x80 => {
                    out.push(char::from(b));
                    self.bump();
                }
                _ => {
                    let (ch, len) = bstr::decode_utf8(&self.input[self.pos..]);
                    match ch {
                        Some(c) => out.push(c),
                        None if self.options.validate_utf8 => {
                            return Err(self.err_here(SyntaxError::InvalidUtf8));
                        }
                        None => out.push('\u{FFFD}'),
                    }
                    self.bump_n(len);
                }
            }
        }
    }

    /// Scans one escape sequence; the backslash is already consumed.
    fn scan_escape(&mut self, out: &mut String) -> Result<(), Error> {
        let Some(b) = self.peek() else {
            return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
        };
        self.bump();
        let c = match b {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => return self.scan_unicode_escape(out),
            other => {
                return Err(self.err_here(SyntaxError::InvalidEscape(char::from(other))));
            }
        };
        out.push(c);
        Ok(())
    }

    /// Scans the hex payload of `\uXXXX`, combining surrogate pairs.
    fn scan_unicode_escape(&mut self, out: &mut String) -> Result<(), Error> {
        let hi = self.scan_hex4()?;
        if (0xDC00..0xE000).contains(&hi) {
            return Err(self.err_here(SyntaxError::LoneSurrogate(hi)));
        }
        if (0xD800..0xDC00).contains(&hi) {
            // High surrogate: the low half must follow immediately.
            if self.peek() != Some(b'\\') || self.peek_at(1) != Some(b'u') {
                return Err(self.err_here(SyntaxError::LoneSurrogate(hi)));
            }
            self.bump();
            self.bump();
            let lo = self.scan_hex4()?;
            if !(0xDC00..0xE000).contains(&lo) {
                return Err(self.err_here(SyntaxError::LoneSurrogate(hi)));
            }
            let combined = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
            let c = char::from_u32(combined)
                .ok_or_else(|| self.err_here(SyntaxError::InvalidUnicodeEscapeSequence(combined)))?;
            out.push(c);
            return Ok(());
        }
        let c = char::from_u32(hi)
            .ok_or_else(|| self.err_here(SyntaxError::InvalidUnicodeEscapeSequence(hi)))?;
        out.push(c);
        Ok(())
    }

    fn scan_hex4(&mut self) -> Result<u32, Error> {
        let mut value = 0u32;
        for _ in 0..4 {
            let Some(b) = self.peek() else {
                return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
            };
            let digit = match b {
                b'0'..=b'9' => u32::from(b - b'0'),
                b'a'..=b'f' => u32::from(b - b'a') + 10,
                b'A'..=b'F' => u32::from(b - b'A') + 10,
                other => {
                    return Err(
                        self.err_here(SyntaxError::InvalidUnicodeEscapeChar(char::from(other)))
                    );
                }
            };
            self.bump();
            value = value * 16 + digit;
        }
        Ok(value)
    }

    /// Scans a number literal. Integral lexemes become [`Event::Int`],
    /// fractional or exponential ones [`Event::Double`].
    fn scan_number(&mut self) -> Result<Event, Error> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.bump();
        }
        match self.peek() {
            Some(b'0') => {
                self.bump();
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(self.err_here(SyntaxError::LeadingZero));
                }
            }
            Some(b'1'..=b'9') => {
                self.bump();
                self.skip_digits();
            }
            Some(_) => return Err(self.invalid_char_here()),
            None => return Err(self.err_here(SyntaxError::UnexpectedEndOfInput)),
        }
        let mut is_double = false;
        if self.peek() == Some(b'.') {
            is_double = true;
            self.bump();
            self.require_digit()?;
            self.skip_digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_double = true;
            self.bump();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.bump();
            }
            self.require_digit()?;
            self.skip_digits();
        }
        let lexeme = core::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.err_here(SyntaxError::MalformedNumber))?;
        if !is_double {
            match lexeme.parse::<i64>() {
                Ok(i) => return Ok(Event::Int(i)),
                Err(_) if self.options.strict_integers => return Err(Error::NumericOverflow),
                Err(_) => {} // lossy fallback below
            }
        }
        let d: f64 = lexeme
            .parse()
            .map_err(|_| self.err_here(SyntaxError::MalformedNumber))?;
        if !d.is_finite() {
            return Err(self.err_here(SyntaxError::NumberOutOfRange));
        }
        Ok(Event::Double(d))
    }

    fn require_digit(&mut self) -> Result<(), Error> {
        match self.peek() {
            Some(b'0'..=b'9') => {
                self.bump();
                Ok(())
            }
            Some(_) => Err(self.invalid_char_here()),
            None => Err(self.err_here(SyntaxError::UnexpectedEndOfInput)),
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.bump();
        }
    }

    fn expect_keyword(&mut self, keyword: &'static [u8]) -> Result<(), Error> {
        let rest = &self.input[self.pos..];
        if rest.starts_with(keyword) {
            for _ in 0..keyword.len() {
                self.bump();
            }
            return Ok(());
        }
        if keyword.starts_with(rest) {
            return Err(self.err_here(SyntaxError::UnexpectedEndOfInput));
        }
        Err(self.invalid_char_here())
    }

    /// Skips JSON whitespace, plus comments when enabled.
    fn skip_whitespace(&mut self) -> Result<(), Error> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => {
                    self.bump();
                }
                Some(b'/') if self.options.allow_comments => match self.peek_at(1) {
                    Some(b'/') => {
                        while !matches!(self.peek(), None | Some(b'\n')) {
                            self.bump();
                        }
                    }
                    Some(b'*') => {
                        self.bump();
                        self.bump();
                        loop {
                            match self.peek() {
                                None => {
                                    return Err(
                                        self.err_here(SyntaxError::UnterminatedComment)
                                    );
                                }
                                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                    self.bump();
                                    self.bump();
                                    break;
                                }
                                Some(_) => self.bump(),
                            }
                        }
                    }
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    // ── low-level cursor ─────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        if let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn err_here(&self, kind: SyntaxError) -> Error {
        Error::malformed(kind, self.line, self.column)
    }

    fn invalid_char_here(&self) -> Error {
        let (ch, _) = bstr::decode_utf8(&self.input[self.pos..]);
        self.err_here(SyntaxError::InvalidCharacter(ch.unwrap_or('\u{FFFD}')))
    }
}
