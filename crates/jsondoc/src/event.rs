//! The event source contract.
//!
//! An event source produces an ordered sequence of [`Event`]s describing one
//! JSON document: scalars, container boundaries, and object keys. The
//! sequence must be well nested — every `MapEnd`/`ArrayEnd` closes the most
//! recent unmatched `MapStart`/`ArrayStart` — and terminates either at clean
//! end-of-input or with an error. The [`Scanner`](crate::Scanner) is the
//! in-crate implementation of this contract; a
//! [`DocumentBuilder`](crate::DocumentBuilder) will consume events from any
//! producer that honors it.

use alloc::string::String;

/// A single primitive JSON parsing event.
///
/// Scalar events carry their decoded value; `MapKey` carries the key text
/// for the entry whose value follows. Events are plain data handed directly
/// to a concrete builder, so no shared callback table or context pointer is
/// involved.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    MapStart,
    MapKey(String),
    MapEnd,
    ArrayStart,
    ArrayEnd,
}
