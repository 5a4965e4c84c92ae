//! Typed field access for level documents
//!
//! Level files are hand-written JSON, so every read goes through an explicit
//! kind check on [`serde_json::Value`]. Absent and `null` fields take their
//! default; a present field of the wrong kind is a
//! [`SchemaError::InvalidField`].

use crate::error::SchemaError;
use crate::Result;
use serde_json::{Map, Value};

/// Parse raw bytes into the top-level document object
pub fn parse_document(bytes: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(SchemaError::InvalidDocument(format!(
            "expected a JSON object at top level, found {}",
            kind_name(&other)
        ))
        .into()),
    }
}

/// Human readable kind of a JSON value
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read-only view of one JSON object, carrying its path for error messages
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>, path: &'a str) -> Self {
        Self { map, path }
    }

    /// View `value` as an object, or fail naming `path`
    pub fn of(value: &'a Value, path: &'a str) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            _ => Err(invalid(path.to_string(), "an object")),
        }
    }

    /// Raw access; `null` reads as absent
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Integer field with default
    pub fn int_or(&self, key: &str, default: i32) -> Result<i32> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => as_int(value).ok_or_else(|| self.invalid(key, "an integer")),
        }
    }

    /// Integer field that must not be negative
    pub fn dimension_or(&self, key: &str, default: i32) -> Result<i32> {
        let value = self.int_or(key, default)?;
        if value < 0 {
            return Err(self.invalid(key, "a non-negative integer"));
        }
        Ok(value)
    }

    /// String field with default
    pub fn str_or(&self, key: &str, default: &'a str) -> Result<&'a str> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    /// Array field, `None` when absent or not an array
    pub fn array(&self, key: &str) -> Option<&'a Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    /// Object field, `None` when absent or not an object
    pub fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// Integer array field; absent means empty
    pub fn int_list(&self, key: &str) -> Result<Vec<i32>> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let items = value
            .as_array()
            .ok_or_else(|| self.invalid(key, "an array of integers"))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                as_int(item).ok_or_else(|| invalid(format!("{}[{}]", self.field(key), i), "an integer"))
            })
            .collect()
    }

    /// Dotted path of `key` within the document
    pub fn field(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn invalid(&self, key: &str, expected: &'static str) -> crate::LevelError {
        invalid(self.field(key), expected)
    }
}

/// Integer reading shared by fields and array elements.
///
/// Floats are truncated toward zero, since editors commonly write entity
/// positions as `12.0`.
pub fn as_int(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = value.as_f64()?;
    if f.is_finite() && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f.trunc() as i32)
    } else {
        None
    }
}

fn invalid(field: String, expected: &'static str) -> crate::LevelError {
    SchemaError::InvalidField { field, expected }.into()
}
