//! The crate's default JSON value representation.
//!
//! [`Value`] can represent any JSON document, and [`StdBuilder`] implements
//! [`JsonBuilder`] for it, making [`Value`] the representation you get
//! without writing a builder of your own.

use alloc::{
    borrow::ToOwned,
    collections::BTreeMap,
    string::{String, ToString},
    vec::Vec,
};

use crate::builder::JsonBuilder;

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use jsondrip::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
// Serde support is available to tests and, via the optional `serde` feature,
// to downstream crates; normal builds stay free of the dependency.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    ///
    /// # Examples
    ///
    /// ```
    /// use jsondrip::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::Boolean(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Number`].
    ///
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }
}

/// Escapes a string for inclusion in a JSON string literal, replacing
/// quotes, backslashes, and control characters with their escape sequences.
pub(crate) fn write_escaped_string<W: core::fmt::Write>(src: &str, f: &mut W) -> core::fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            // Escape the Unicode line separators which pre-2019 JSON parsers
            // may treat as line terminators.
            '\u{2028}' | '\u{2029}' => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            c if c.is_ascii_control() || c.is_control() && c as u32 <= 0xFFFF => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => f.write_str(&n.to_string()),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                let mut first = true;
                for v in arr {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(",")?;
                    }
                    first = false;
                    f.write_str("\"")?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Builder producing the crate's standard [`Value`] representation.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdBuilder;

/// An array or object under construction by [`StdBuilder`].
#[derive(Clone, Debug)]
pub enum StdFrame {
    Array(Array),
    Object { map: Map, pending_key: Option<String> },
}

impl JsonBuilder for StdBuilder {
    type Value = Value;
    type Frame = StdFrame;

    fn null(&self) -> Value {
        Value::Null
    }

    fn boolean(&self, value: bool) -> Value {
        Value::Boolean(value)
    }

    fn string(&self, text: &str) -> Value {
        Value::String(text.to_owned())
    }

    /// # Panics
    ///
    /// Panics if `literal` is not an RFC 8259 number literal. The parser only
    /// ever hands over spans matching that production, all of which `f64`
    /// accepts.
    fn number(&self, literal: &str, _has_fraction_or_exponent: bool) -> Value {
        Value::Number(literal.parse().unwrap())
    }

    fn begin_array(&self) -> StdFrame {
        StdFrame::Array(Array::new())
    }

    fn begin_object(&self) -> StdFrame {
        StdFrame::Object {
            map: Map::new(),
            pending_key: None,
        }
    }

    fn add_key(&self, frame: &mut StdFrame, key: &str) {
        if let StdFrame::Object { pending_key, .. } = frame {
            *pending_key = Some(key.to_owned());
        }
    }

    /// Duplicate keys resolve to the last occurrence.
    fn add_value(&self, frame: &mut StdFrame, value: Value) {
        match frame {
            StdFrame::Array(items) => items.push(value),
            StdFrame::Object { map, pending_key } => {
                if let Some(key) = pending_key.take() {
                    map.insert(key, value);
                }
            }
        }
    }

    fn finish(&self, frame: StdFrame) -> Value {
        match frame {
            StdFrame::Array(items) => Value::Array(items),
            StdFrame::Object { map, .. } => Value::Object(map),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    #[test]
    fn display_escapes_strings() {
        let v = Value::String("a\"b\\c\nd".into());
        assert_eq!(v.to_string(), "\"a\\\"b\\\\c\\u000Ad\"");
        let sep = Value::String("a\u{2028}b\u{2029}c".into());
        assert_eq!(sep.to_string(), "\"a\\u2028b\\u2029c\"");
    }

    #[test]
    fn display_round_trips_through_serde_json() {
        let mut map = Map::new();
        map.insert("xs".into(), Value::Array(vec![Value::Number(1.5), Value::Null]));
        let text = Value::Object(map).to_string();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["xs"][0], serde_json::json!(1.5));
        assert!(parsed["xs"][1].is_null());
    }

    #[test]
    fn std_builder_assembles_objects() {
        let b = StdBuilder;
        let mut frame = b.begin_object();
        b.add_key(&mut frame, "n");
        b.add_value(&mut frame, b.number("1", false));
        b.add_key(&mut frame, "n");
        b.add_value(&mut frame, b.number("2", false));
        let value = b.finish(frame);
        let mut expected = Map::new();
        // Last duplicate wins.
        expected.insert("n".into(), Value::Number(2.0));
        assert_eq!(value, Value::Object(expected));
    }
}
