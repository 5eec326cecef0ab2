//! JSON value types and conversions.
//!
//! This module defines the [`Value`] enum, which represents any valid JSON
//! value, together with the conversion boundary from host types: `From`
//! impls for scalars and containers, and the [`ToJson`] trait for recursive
//! conversion of typed data.

use alloc::{collections::BTreeMap, string::String, string::ToString, vec::Vec};

use crate::{
    error::Error,
    generator::{Generator, GeneratorOptions},
};

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// Unlike pure JavaScript, numbers keep their lexical class: integers that
/// fit 64 signed bits are [`Int`], everything else numeric is [`Double`].
/// Equality is structural and recursive with no coercion across variants —
/// `Value::Int(1)` is not equal to `Value::Double(1.0)`.
///
/// Objects are backed by a [`BTreeMap`], which makes keys unique and gives
/// the generator its sorted-key iteration order for free. Values are built
/// bottom-up from a well-nested event stream and a closed container is
/// never handed back out for mutation, so trees are acyclic by
/// construction.
///
/// # Examples
///
/// ```
/// use jsondoc::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
/// [`Int`]: Value::Int
/// [`Double`]: Value::Double
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

// 2^63 as f64; the smallest double that no longer fits i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Value {
    /// Classifies an opaque numeric input: [`Int`] if the double
    /// round-trips exactly through a 64-bit signed integer, [`Double`]
    /// otherwise.
    ///
    /// ```
    /// use jsondoc::Value;
    ///
    /// assert_eq!(Value::number(3.0), Value::Int(3));
    /// assert_eq!(Value::number(3.5), Value::Double(3.5));
    /// assert_eq!(Value::number(1.0e19), Value::Double(1.0e19));
    /// ```
    ///
    /// [`Int`]: Value::Int
    /// [`Double`]: Value::Double
    #[must_use]
    pub fn number(n: f64) -> Self {
        if n.is_finite() && n >= -I64_BOUND && n < I64_BOUND {
            #[allow(clippy::cast_possible_truncation)]
            let i = n as i64;
            #[allow(clippy::cast_precision_loss)]
            if i as f64 == n {
                return Self::Int(i);
            }
        }
        Self::Double(n)
    }

    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is a number, either [`Int`] or
    /// [`Double`].
    ///
    /// [`Int`]: Value::Int
    /// [`Double`]: Value::Double
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(..) | Self::Double(..))
    }

    /// Returns the inner boolean if the value is [`Bool`].
    ///
    /// [`Bool`]: Value::Bool
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the inner integer if the value is [`Int`].
    ///
    /// [`Int`]: Value::Int
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the inner double if the value is [`Double`].
    ///
    /// [`Double`]: Value::Double
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the inner string if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the element sequence if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the key mapping if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if the value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Bool(b) => Self::Bool(*b),
            Self::Int(i) => Self::Int(*i),
            Self::Double(d) => Self::Double(*d),
            Self::String(s) => Self::String(s.clone()),
            Self::Array(_) | Self::Object(_) => deep_clone(self),
        }
    }
}

/// Clones a container tree with an explicit frame stack, so nesting depth
/// is bounded by the heap rather than the call stack.
fn deep_clone(root: &Value) -> Value {
    enum Frame<'v> {
        Array {
            src: core::slice::Iter<'v, Value>,
            out: Array,
        },
        Object {
            src: alloc::collections::btree_map::Iter<'v, String, Value>,
            out: Map,
            pending: Option<String>,
        },
    }

    impl<'v> Frame<'v> {
        /// Opens a frame over a container, or clones a scalar outright.
        fn open(value: &'v Value) -> Result<Self, Value> {
            match value {
                Value::Array(items) => Ok(Self::Array {
                    src: items.iter(),
                    out: Array::with_capacity(items.len()),
                }),
                Value::Object(map) => Ok(Self::Object {
                    src: map.iter(),
                    out: Map::new(),
                    pending: None,
                }),
                Value::Null => Err(Value::Null),
                Value::Bool(b) => Err(Value::Bool(*b)),
                Value::Int(i) => Err(Value::Int(*i)),
                Value::Double(d) => Err(Value::Double(*d)),
                Value::String(s) => Err(Value::String(s.clone())),
            }
        }

        fn attach(&mut self, value: Value) {
            match self {
                Self::Array { out, .. } => out.push(value),
                Self::Object { out, pending, .. } => {
                    // A pending key is always set before a child is cloned.
                    if let Some(key) = pending.take() {
                        out.insert(key, value);
                    }
                }
            }
        }
    }

    let mut current = match Frame::open(root) {
        Ok(frame) => frame,
        Err(scalar) => return scalar,
    };
    let mut stack: Vec<Frame<'_>> = Vec::new();
    loop {
        let next = match &mut current {
            Frame::Array { src, .. } => src.next(),
            Frame::Object { src, pending, .. } => match src.next() {
                Some((key, child)) => {
                    *pending = Some(key.clone());
                    Some(child)
                }
                None => None,
            },
        };
        match next {
            Some(child) => match Frame::open(child) {
                Ok(frame) => stack.push(core::mem::replace(&mut current, frame)),
                Err(scalar) => current.attach(scalar),
            },
            None => {
                let finished = match current {
                    Frame::Array { out, .. } => Value::Array(out),
                    Frame::Object { out, .. } => Value::Object(out),
                };
                match stack.pop() {
                    Some(parent) => {
                        current = parent;
                        current.attach(finished);
                    }
                    None => return finished,
                }
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int_for_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int_for_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Double(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl TryFrom<u64> for Value {
    type Error = Error;

    /// Fails with [`Error::NumericOverflow`] when `v` exceeds `i64::MAX`.
    fn try_from(v: u64) -> Result<Self, Error> {
        i64::try_from(v)
            .map(Self::Int)
            .map_err(|_| Error::NumericOverflow)
    }
}

/// Recursive conversion of host data into a [`Value`] tree.
///
/// This is the typed counterpart of a dynamic `Any`-to-JSON boundary: a
/// type without an impl simply does not convert, so "unsupported input" is
/// a compile-time failure rather than a runtime one. An absent value
/// (`Option::None`) converts to [`Value::Null`].
///
/// ```
/// use jsondoc::{ToJson, Value};
///
/// let v = vec![Some(1i64), None].to_json();
/// assert_eq!(v, Value::Array(vec![Value::Int(1), Value::Null]));
/// ```
pub trait ToJson {
    fn to_json(&self) -> Value;
}

impl ToJson for Value {
    fn to_json(&self) -> Value {
        self.clone()
    }
}

impl ToJson for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_to_json_for_int {
    ($($t:ty),*) => {
        $(
            impl ToJson for $t {
                fn to_json(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }
        )*
    };
}

impl_to_json_for_int!(i8, i16, i32, i64, u8, u16, u32);

impl ToJson for f64 {
    fn to_json(&self) -> Value {
        Value::Double(*self)
    }
}

impl ToJson for f32 {
    fn to_json(&self) -> Value {
        Value::Double(f64::from(*self))
    }
}

impl ToJson for str {
    fn to_json(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl ToJson for String {
    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self) -> Value {
        match self {
            Some(v) => v.to_json(),
            None => Value::Null,
        }
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(ToJson::to_json).collect())
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<T: ToJson> ToJson for BTreeMap<String, T> {
    fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_json(&self) -> Value {
        (**self).to_json()
    }
}

impl core::fmt::Display for Value {
    /// Renders canonical compact JSON: sorted object keys, no incidental
    /// whitespace. Delegates to the [`Generator`] so that escaping rules
    /// exist in exactly one place.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut generator = Generator::new(GeneratorOptions::default());
        generator.write(self);
        f.write_str(generator.as_str())
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec, vec::Vec};

    use super::{Array, Map, ToJson, Value};
    use crate::error::Error;

    // The derived drop glue recurses through nested containers, so deep
    // trees built in tests are torn down iteratively.
    fn dismantle(value: Value) {
        let mut work = vec![value];
        while let Some(v) = work.pop() {
            match v {
                Value::Array(items) => work.extend(items),
                Value::Object(map) => work.extend(map.into_values()),
                _ => {}
            }
        }
    }

    #[test]
    fn number_classification() {
        assert_eq!(Value::number(0.0), Value::Int(0));
        assert_eq!(Value::number(-3.0), Value::Int(-3));
        assert_eq!(Value::number(3.5), Value::Double(3.5));
        assert!(matches!(Value::number(f64::NAN), Value::Double(d) if d.is_nan()));
        // 2^63 is the first double past i64::MAX; it must stay a double.
        assert_eq!(
            Value::number(9_223_372_036_854_775_808.0),
            Value::Double(9_223_372_036_854_775_808.0)
        );
        // -2^63 is exactly i64::MIN.
        assert_eq!(Value::number(-9_223_372_036_854_775_808.0), Value::Int(i64::MIN));
    }

    #[test]
    fn no_cross_variant_equality() {
        assert_ne!(Value::Int(1), Value::Double(1.0));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn u64_conversion_overflow() {
        assert_eq!(Value::try_from(7u64), Ok(Value::Int(7)));
        assert_eq!(
            Value::try_from(u64::MAX),
            Err(Error::NumericOverflow)
        );
    }

    #[test]
    fn to_json_recurses() {
        let mut source = alloc::collections::BTreeMap::new();
        source.insert("a".to_string(), vec![Some(2i32), None]);

        assert_eq!(
            source.to_json(),
            Value::Object(Map::from([(
                "a".to_string(),
                Value::Array(vec![Value::Int(2), Value::Null])
            )]))
        );
        assert_eq!(None::<i64>.to_json(), Value::Null);
        assert_eq!("hi".to_json(), Value::String("hi".to_string()));
    }

    #[test]
    fn clone_preserves_structure() {
        let mut inner = Map::new();
        inner.insert("x".to_string(), Value::Null);
        let mut map = Map::new();
        map.insert(
            "a".to_string(),
            Value::Array(vec![Value::Int(1), Value::Object(inner)]),
        );
        map.insert("b".to_string(), Value::Array(Vec::new()));
        map.insert("c".to_string(), Value::String("s".to_string()));
        let value = Value::Object(map);
        assert_eq!(value.clone(), value);
    }

    #[test]
    fn clone_of_a_deep_tree() {
        let mut value = Value::Array(Array::new());
        for _ in 0..200_000 {
            value = Value::Array(vec![value]);
        }
        let copy = value.to_json();
        assert!(matches!(&copy, Value::Array(items) if items.len() == 1));
        dismantle(value);
        dismantle(copy);
    }

    #[test]
    fn display_is_compact_and_sorted() {
        let mut map = Map::new();
        map.insert("b".to_string(), Value::Int(2));
        map.insert("a".to_string(), Value::Int(1));
        assert_eq!(Value::Object(map).to_string(), r#"{"a":1,"b":2}"#);
    }
}
