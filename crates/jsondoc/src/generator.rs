//! Deterministic serialization of a [`Value`] tree to bytes.
//!
//! Object keys are always emitted in sorted order, so two structurally
//! equal documents produce byte-identical output no matter how their
//! objects were populated.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::value::Value;

/// Formatting options for the [`Generator`].
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Insert newlines and indentation per nesting level.
    ///
    /// # Default
    ///
    /// `false` — the most compact possible output.
    pub beautify: bool,

    /// The text inserted once per nesting level when
    /// [`beautify`](Self::beautify) is set.
    ///
    /// # Default
    ///
    /// Four spaces.
    pub indent: String,

    /// Validate that string content is well-formed UTF-8 before emitting
    /// it.
    ///
    /// Rust's `String` type guarantees this statically, so the check is
    /// always satisfied here; the option exists for configuration parity
    /// with engines that serialize raw byte strings.
    ///
    /// # Default
    ///
    /// `false`
    pub validate_utf8: bool,

    /// Always escape the forward slash as `\/`.
    ///
    /// JSON does not require `/` to be escaped, and leaving it plain saves
    /// bytes; forcing the escape makes output safe for direct embedding in
    /// HTML `<script>` contexts.
    ///
    /// # Default
    ///
    /// `false`
    pub escape_forward_slash: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            beautify: false,
            indent: String::from("    "),
            validate_utf8: false,
            escape_forward_slash: false,
        }
    }
}

/// Serializes [`Value`] trees into an internal growable byte buffer.
///
/// One generator may be reused across sequential writes: [`reset`] clears
/// the buffer without releasing its backing storage. A generator must never
/// be written to concurrently; it is a plain single-threaded state machine.
///
/// The caller is responsible for handing in values that satisfy the value
/// model — in particular, non-finite numbers have no JSON representation
/// and are rejected ahead of time by [`to_bytes`](crate::to_bytes) rather
/// than defended against here.
///
/// [`reset`]: Generator::reset
///
/// # Examples
///
/// ```
/// use jsondoc::{Generator, GeneratorOptions, Value};
///
/// let mut generator = Generator::new(GeneratorOptions::default());
/// generator.write(&Value::Array(vec![Value::Int(1), Value::String("hello".into())]));
/// assert_eq!(generator.buffer(), br#"[1,"hello"]"#);
/// ```
#[derive(Debug)]
pub struct Generator {
    options: GeneratorOptions,
    // Output is always valid UTF-8; buffering a String keeps the writer
    // infallible while `buffer()` still exposes plain bytes.
    buf: String,
}

/// One deferred unit of serialization work. Closers and separators are
/// pushed alongside child values so the whole walk stays iterative.
enum Step<'v> {
    Value(&'v Value),
    Key(&'v str),
    Comma,
    Indent,
    CloseArray,
    CloseObject,
}

impl Generator {
    #[must_use]
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            buf: String::new(),
        }
    }

    /// The options this generator was created with.
    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Appends one serialized value to the buffer.
    pub fn write(&mut self, value: &Value) {
        self.write_value(value);
    }

    /// The accumulated output bytes.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consumes the generator, returning the accumulated bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_bytes()
    }

    /// Clears the buffer for reuse, keeping its backing storage.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Serializes one value with an explicit work stack, so nesting depth
    /// is bounded by the heap rather than the call stack.
    fn write_value(&mut self, value: &Value) {
        let mut depth = 0usize;
        let mut work = alloc::vec![Step::Value(value)];
        while let Some(step) = work.pop() {
            match step {
                Step::Value(Value::Null) => self.buf.push_str("null"),
                Step::Value(Value::Bool(true)) => self.buf.push_str("true"),
                Step::Value(Value::Bool(false)) => self.buf.push_str("false"),
                Step::Value(Value::Int(i)) => {
                    // Writing into a String cannot fail.
                    let _ = write!(self.buf, "{i}");
                }
                Step::Value(Value::Double(d)) => self.write_double(*d),
                Step::Value(Value::String(s)) => self.write_string(s),
                Step::Value(Value::Array(items)) => {
                    if items.is_empty() {
                        self.buf.push_str("[]");
                        continue;
                    }
                    self.buf.push('[');
                    depth += 1;
                    work.push(Step::CloseArray);
                    for (i, item) in items.iter().enumerate().rev() {
                        work.push(Step::Value(item));
                        work.push(Step::Indent);
                        if i > 0 {
                            work.push(Step::Comma);
                        }
                    }
                }
                Step::Value(Value::Object(map)) => {
                    if map.is_empty() {
                        self.buf.push_str("{}");
                        continue;
                    }
                    self.buf.push('{');
                    depth += 1;
                    work.push(Step::CloseObject);
                    // BTreeMap iterates keys in lexicographic order, which
                    // is the sorted-key output guarantee.
                    for (i, (key, item)) in map.iter().enumerate().rev() {
                        work.push(Step::Value(item));
                        work.push(Step::Key(key));
                        work.push(Step::Indent);
                        if i > 0 {
                            work.push(Step::Comma);
                        }
                    }
                }
                Step::Key(key) => {
                    self.write_string(key);
                    self.buf.push(':');
                    if self.options.beautify {
                        self.buf.push(' ');
                    }
                }
                Step::Comma => self.buf.push(','),
                Step::Indent => self.newline_indent(depth),
                Step::CloseArray => {
                    depth -= 1;
                    self.newline_indent(depth);
                    self.buf.push(']');
                }
                Step::CloseObject => {
                    depth -= 1;
                    self.newline_indent(depth);
                    self.buf.push('}');
                }
            }
        }
    }

    fn write_double(&mut self, d: f64) {
        let start = self.buf.len();
        let _ = write!(self.buf, "{d}");
        // An integral-looking rendering gets a trailing ".0" so the lexeme
        // re-parses as a double rather than an integer.
        if !self.buf[start..].contains(['.', 'e', 'E', 'i', 'N']) {
            self.buf.push_str(".0");
        }
    }

    fn write_string(&mut self, s: &str) {
        self.buf.push('"');
        for c in s.chars() {
            match c {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '/' if self.options.escape_forward_slash => self.buf.push_str("\\/"),
                '\u{0008}' => self.buf.push_str("\\b"),
                '\u{000C}' => self.buf.push_str("\\f"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(self.buf, "\\u{:04X}", c as u32);
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }

    fn newline_indent(&mut self, depth: usize) {
        if self.options.beautify {
            self.buf.push('\n');
            for _ in 0..depth {
                self.buf.push_str(&self.options.indent);
            }
        }
    }
}
