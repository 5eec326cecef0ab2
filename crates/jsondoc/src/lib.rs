//! Event-driven JSON document assembly and generation.
//!
//! `jsondoc` splits JSON processing into small, separately usable pieces:
//!
//! - a [`Scanner`] that turns raw bytes into a stream of primitive
//!   [`Event`]s (scalars, container boundaries, object keys);
//! - a [`DocumentBuilder`] stack machine that consumes events and
//!   materializes a [`Value`] tree, notifying a [`DocumentObserver`]
//!   synchronously as values finalize;
//! - a [`Generator`] that serializes a [`Value`] tree back into bytes with
//!   deterministic, sorted-key output.
//!
//! The facade functions [`parse`], [`to_bytes`], and [`is_valid`] wire
//! these together for the common cases.
//!
//! ```
//! use jsondoc::{GeneratorOptions, ScannerOptions, Value, parse, to_bytes};
//!
//! let root = parse(br#"{"hello": "world"}"#, ScannerOptions::default()).unwrap();
//! assert_eq!(root.get("hello"), Some(&Value::String("world".into())));
//!
//! let bytes = to_bytes(&root, &GeneratorOptions::default()).unwrap();
//! assert_eq!(bytes, br#"{"hello":"world"}"#);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod document;
mod error;
mod event;
mod generator;
mod scanner;
mod value;

#[cfg(test)]
mod tests;

pub use document::{DocumentBuilder, DocumentObserver, NoopObserver, ParseStatus};
pub use error::{Error, SyntaxError};
pub use event::Event;
pub use generator::{Generator, GeneratorOptions};
pub use scanner::{Scanner, ScannerOptions};
pub use value::{Array, Map, ToJson, Value};

use alloc::vec::Vec;

/// Parses one JSON document from `input`, returning its root value.
///
/// With [`ScannerOptions::allow_multiple_values`] only the first document
/// is consumed (see [`parse_multiple`] for the rest); with
/// [`ScannerOptions::allow_partial_input`] a truncated document is
/// completed by closing its open containers.
///
/// # Errors
///
/// [`Error::MalformedInput`] when the bytes are not well-formed JSON under
/// the given options, including empty input.
pub fn parse(input: &[u8], options: ScannerOptions) -> Result<Value, Error> {
    let mut scanner = Scanner::new(input, options);
    let mut builder = DocumentBuilder::new();
    builder.consume(&mut scanner)?;
    if options.allow_partial_input && !builder.is_complete() {
        builder.finish_partial()?;
    }
    finish(builder, &scanner)
}

/// Parses every whitespace-separated top-level JSON value in `input`.
///
/// Implies [`ScannerOptions::allow_multiple_values`]; a fresh document is
/// built for each value, so one shared scanner drives a sequence of
/// single-use builders.
///
/// # Errors
///
/// The first scan or build error, if any. An empty input yields an empty
/// vector.
pub fn parse_multiple(input: &[u8], options: ScannerOptions) -> Result<Vec<Value>, Error> {
    let mut options = options;
    options.allow_multiple_values = true;
    let mut scanner = Scanner::new(input, options);
    let mut values = Vec::new();
    loop {
        let mut builder = DocumentBuilder::new();
        builder.consume(&mut scanner)?;
        if !builder.is_complete() {
            if options.allow_partial_input {
                builder.finish_partial()?;
                if let Some(value) = builder.into_root() {
                    values.push(value);
                }
            }
            return Ok(values);
        }
        if let Some(value) = builder.into_root() {
            values.push(value);
        }
    }
}

/// Serializes `value` under the given formatting options.
///
/// The value is validated first: every leaf must be null, boolean, string,
/// or a finite number, recursively through containers.
///
/// # Errors
///
/// [`Error::InvalidSerializationInput`] when a NaN or infinite number is
/// reachable from `value`.
pub fn to_bytes(value: &Value, options: &GeneratorOptions) -> Result<Vec<u8>, Error> {
    check_serializable(value)?;
    let mut generator = Generator::new(options.clone());
    generator.write(value);
    Ok(generator.into_bytes())
}

/// Whether `value` can be serialized as JSON.
///
/// ```
/// use jsondoc::{Value, is_valid};
///
/// assert!(is_valid(&Value::Array(vec![Value::Int(1)])));
/// assert!(!is_valid(&Value::Array(vec![Value::Double(f64::NAN)])));
/// ```
#[must_use]
pub fn is_valid(value: &Value) -> bool {
    check_serializable(value).is_ok()
}

/// Recursive validity check, driven by an explicit work stack so that
/// pathologically deep values cannot exhaust the call stack.
fn check_serializable(value: &Value) -> Result<(), Error> {
    let mut work = Vec::new();
    work.push(value);
    while let Some(v) = work.pop() {
        match v {
            Value::Double(d) if !d.is_finite() => {
                return Err(Error::InvalidSerializationInput(
                    "non-finite number has no JSON representation",
                ));
            }
            Value::Array(items) => work.extend(items.iter()),
            Value::Object(map) => work.extend(map.values()),
            _ => {}
        }
    }
    Ok(())
}

fn finish<O: DocumentObserver>(builder: DocumentBuilder<O>, scanner: &Scanner<'_>) -> Result<Value, Error> {
    match builder.into_root() {
        Some(root) => Ok(root),
        None => {
            let (line, column) = scanner.position();
            Err(Error::MalformedInput {
                kind: SyntaxError::UnexpectedEndOfInput,
                line,
                column,
            })
        }
    }
}
