//! Entity placements and property coercion
//!
//! Entity properties arrive as arbitrary JSON values but are exposed to the
//! game as a flat string map. Scalars are stringified; compound values and
//! `null` are dropped.

use crate::document::Fields;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Entity type used when a placement has none
pub const UNKNOWN_ENTITY_TYPE: &str = "unknown";

/// One entity placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Entity type name (e.g. "coin", "spike", "flag")
    #[serde(rename = "type")]
    pub entity_type: String,

    /// X position
    pub x: i32,

    /// Y position
    pub y: i32,

    /// Properties, stringified
    pub extras: HashMap<String, String>,
}

impl Default for EntityDefinition {
    fn default() -> Self {
        Self {
            entity_type: UNKNOWN_ENTITY_TYPE.into(),
            x: 0,
            y: 0,
            extras: HashMap::new(),
        }
    }
}

impl EntityDefinition {
    /// Look up a property
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }
}

/// Property value, classified by JSON kind
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array,
    Object,
}

impl PropertyValue {
    /// Classify a JSON value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    PropertyValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    PropertyValue::UInt(u)
                } else {
                    PropertyValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => PropertyValue::String(s.clone()),
            Value::Array(_) => PropertyValue::Array,
            Value::Object(_) => PropertyValue::Object,
        }
    }

    /// String form of a scalar, `None` for values that are dropped
    pub fn coerce(self) -> Option<String> {
        match self {
            PropertyValue::String(s) => Some(s),
            PropertyValue::Int(i) => Some(i.to_string()),
            PropertyValue::UInt(u) => Some(u.to_string()),
            PropertyValue::Float(f) => Some(format_float(f)),
            PropertyValue::Bool(b) => Some(if b { "true" } else { "false" }.to_string()),
            PropertyValue::Null | PropertyValue::Array | PropertyValue::Object => None,
        }
    }
}

/// Shortest round-trippable decimal, always with a fractional part
pub fn format_float(value: f64) -> String {
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Coerce the `entities` array of a level document.
///
/// Anything other than an array reads as no entities.
pub fn coerce_entities(source: Option<&Value>) -> Result<Vec<EntityDefinition>> {
    let Some(entries) = source.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut entities = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let path = format!("entities[{}]", i);
        let fields = Fields::of(entry, &path)?;
        entities.push(coerce_entity(&fields)?);
    }
    Ok(entities)
}

fn coerce_entity(fields: &Fields<'_>) -> Result<EntityDefinition> {
    let mut extras = HashMap::new();
    if let Some(properties) = fields.object("properties") {
        for (key, value) in properties {
            if let Some(text) = PropertyValue::from_json(value).coerce() {
                extras.insert(key.clone(), text);
            }
        }
    }

    Ok(EntityDefinition {
        entity_type: fields.str_or("type", UNKNOWN_ENTITY_TYPE)?.to_string(),
        x: fields.int_or("x", 0)?,
        y: fields.int_or("y", 0)?,
        extras,
    })
}
