//! Request parameter values and their form-urlencoded encoding.
//!
//! Parameters are an ordered list of `key → ParamValue` pairs. Scalars go on
//! the wire as plain text; lists and mappings are JSON-encoded and sent as the
//! value of their key.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// A single parameter value: a scalar, a list, or a mapping.
///
/// # Examples
///
/// ```
/// use pocketradar::params::ParamValue;
///
/// assert_eq!(ParamValue::from("hello").to_form_value(), "hello");
/// assert_eq!(ParamValue::from(true).to_form_value(), "1");
/// assert_eq!(
///     ParamValue::from(vec![1i64, 2i64]).to_form_value(),
///     "[1,2]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// JSON `null`.
    Null,
    /// A boolean, sent as `1` or `0`.
    Bool(bool),
    /// A number, sent in decimal.
    Number(Number),
    /// A string, sent as is.
    String(String),
    /// A list, sent JSON-encoded.
    List(Vec<ParamValue>),
    /// A mapping, sent JSON-encoded.
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Converts any serializable value into a `ParamValue`.
    ///
    /// Structs and maps become [`ParamValue::Map`], sequences become
    /// [`ParamValue::List`], recursively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if `value` cannot be
    /// represented as JSON (e.g. a map with non-string keys).
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|e| Error::SerializationFailed(e.to_string()))
    }

    /// Returns `true` for the non-structured variants.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ParamValue::List(_) | ParamValue::Map(_))
    }

    /// Returns the text this value is sent as in a form body.
    pub fn to_form_value(&self) -> String {
        match self {
            ParamValue::Bool(true) => "1".to_string(),
            ParamValue::Bool(false) => "0".to_string(),
            ParamValue::Number(n) => n.to_string(),
            ParamValue::String(s) => s.clone(),
            ParamValue::Null | ParamValue::List(_) | ParamValue::Map(_) => {
                self.to_json().to_string()
            }
        }
    }

    /// Returns the truthiness of the value.
    ///
    /// `null`, `false`, zero, `""`, `"0"` and empty collections are falsy.
    pub fn is_truthy(&self) -> bool {
        is_truthy(&self.to_json())
    }

    /// Converts the value into a [`serde_json::Value`].
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Null => Value::Null,
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Number(n) => Value::Number(n.clone()),
            ParamValue::String(s) => Value::String(s.clone()),
            ParamValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            ParamValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Truthiness of a JSON value, used for service flags such as `error`.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => ParamValue::Number(n),
            Value::String(s) => ParamValue::String(s),
            Value::Array(items) => ParamValue::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                ParamValue::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(ParamValue::Null, ParamValue::Number)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// An ordered set of request parameters.
///
/// Inserting an existing key replaces its value in place.
///
/// # Examples
///
/// ```
/// use pocketradar::params::Params;
///
/// let params = Params::new()
///     .with("email", "a@b.com")
///     .with("password", "secret word");
///
/// assert_eq!(params.to_form_body(), "email=a%40b.com&password=secret+word");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from the top-level fields of a serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if the value does not serialize
    /// to a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        match ParamValue::from_serialize(value)? {
            ParamValue::Map(map) => Ok(map.into_iter().collect()),
            ParamValue::Null => Ok(Self::new()),
            other => Err(Error::SerializationFailed(format!(
                "expected an object, got {}",
                other.to_json()
            ))),
        }
    }

    /// Adds a parameter, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encodes the parameters as `application/x-www-form-urlencoded`.
    pub fn to_form_body(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, &value.to_form_value());
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
