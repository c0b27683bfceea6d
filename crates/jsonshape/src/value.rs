//! Open JSON values.
//!
//! [`Value`] is the destination for fields whose shape is not known ahead of
//! time. Its representation follows the tokens actually read: objects become
//! a [`Map`], arrays an [`Array`], and scalars their natural type.
use std::collections::BTreeMap;

use crate::{
    decoder::{Decode, Decoder},
    error::{DecodeError, ErrorKind},
    read::Read,
    shape::Shape,
    token::{Token, TokenKind},
};

/// Object members, sorted by key.
pub type Map = BTreeMap<String, Value>;
/// Array elements in document order.
pub type Array = Vec<Value>;

/// Any JSON value.
///
/// Integers that fit an `i64` are kept exact; larger ones and all numbers
/// with a fraction or exponent are stored as `f64`.
///
/// # Examples
///
/// ```
/// use jsonshape::Value;
///
/// let v: Value = jsonshape::from_str(r#"{"id": 7, "tags": ["a"]}"#).unwrap();
/// assert_eq!(v.get("id"), Some(&Value::Integer(7)));
/// assert!(v.get("tags").is_some_and(Value::is_array));
/// ```
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(test, feature = "serde"), serde(untagged))]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// `null`.
    #[default]
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// A number that fits an `i64`.
    Integer(i64),
    /// Any other number.
    Float(f64),
    /// A string.
    String(String),
    /// An array.
    Array(Array),
    /// An object.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
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
    /// Returns `true` for `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for booleans.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` for both integers and floats.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(..) | Self::Float(..))
    }

    /// Returns `true` for strings.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` for arrays.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` for objects.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Borrows the string if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, without converting floats.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns any number as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrows the elements if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Borrows the members if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }

    fn from_scalar(token: &Token<'_>) -> Result<Self, ErrorKind> {
        let text = || token.as_str().ok_or_else(|| token.invalid("not valid utf-8"));
        match token.kind() {
            TokenKind::Null => Ok(Self::Null),
            TokenKind::Boolean => Ok(Self::Boolean(token.bytes().first() == Some(&b't'))),
            TokenKind::String => text().map(|s| Self::String(s.to_owned())),
            TokenKind::Integer => {
                let s = text()?;
                s.parse()
                    .map(Self::Integer)
                    .or_else(|_| s.parse().map(Self::Float))
                    .map_err(|_| token.invalid("not a valid number"))
            }
            TokenKind::Float => text()?
                .parse()
                .map(Self::Float)
                .map_err(|_| token.invalid("not a valid number")),
            _ => Err(token.invalid("expected a value")),
        }
    }
}

impl Decode for Value {
    const SHAPE: Shape = Shape::Dynamic;

    fn decode<'src, R: Read<'src>>(
        &mut self,
        de: &mut Decoder<'src, R>,
    ) -> Result<(), DecodeError> {
        *self = match de.next_kind()? {
            TokenKind::OpenArray => {
                let mut items = Array::new();
                de.decode_elements(|de, _| {
                    let mut item = Value::Null;
                    item.decode(de)?;
                    items.push(item);
                    Ok(())
                })?;
                Value::Array(items)
            }
            TokenKind::OpenObject => {
                let mut map = Map::new();
                de.decode_entries(|de, key| {
                    let mut value = Value::Null;
                    value.decode(de)?;
                    map.insert(key.to_owned(), value);
                    Ok(())
                })?;
                Value::Object(map)
            }
            found if found.is_scalar() => {
                let offset = de.lexer().offset();
                let scalar = de.current().map_or(Ok(Value::Null), Value::from_scalar);
                scalar.map_err(|kind| DecodeError::new(kind, offset))?
            }
            found => return Err(de.unexpected(found, Self::SHAPE)),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Value {
        crate::from_str(input).unwrap()
    }

    #[test]
    fn representation_follows_tokens() {
        let v = parse(r#"{"a": [1, 2.5, "x", true, null], "b": {}}"#);
        let expected = Value::Object(Map::from([
            (
                "a".to_owned(),
                Value::Array(vec![
                    Value::Integer(1),
                    Value::Float(2.5),
                    "x".into(),
                    true.into(),
                    Value::Null,
                ]),
            ),
            ("b".to_owned(), Value::Object(Map::new())),
        ]));
        assert_eq!(v, expected);
    }

    #[test]
    fn integer_overflow_falls_back_to_float() {
        assert_eq!(parse("9223372036854775807"), Value::Integer(i64::MAX));
        assert_eq!(parse("18446744073709551616"), Value::Float(18_446_744_073_709_551_616.0));
    }

    #[test]
    fn agrees_with_serde_json() {
        let input = r#"{"name": "lasse", "scores": [1, -2, 3.5e2], "meta": {"ok": false}}"#;
        let ours = parse(input);
        let theirs: Value = serde_json::from_str(input).unwrap();
        assert_eq!(ours, theirs);
    }
}
