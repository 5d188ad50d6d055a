//! Schema types

use super::coerce::coerce_value;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, Record};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Boolean => write!(f, "boolean"),
            JsonType::Object => write!(f, "object"),
            JsonType::Array => write!(f, "array"),
            JsonType::Null => write!(f, "null"),
        }
    }
}

/// Declared type of a stream property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Integer,
    Number,
    String,
    Boolean,
    /// String carrying an RFC 3339 timestamp
    DateTime,
}

impl PropertyType {
    /// Underlying JSON type
    pub fn json_type(self) -> JsonType {
        match self {
            PropertyType::Integer => JsonType::Integer,
            PropertyType::Number => JsonType::Number,
            PropertyType::String | PropertyType::DateTime => JsonType::String,
            PropertyType::Boolean => JsonType::Boolean,
        }
    }

    /// JSON Schema `format` hint, if any
    pub fn format(self) -> Option<&'static str> {
        match self {
            PropertyType::DateTime => Some("date-time"),
            _ => None,
        }
    }

    /// Nullable JSON Schema fragment for this type
    pub fn to_json_schema(self) -> JsonValue {
        let mut prop = JsonObject::new();
        prop.insert(
            "type".to_string(),
            json!([self.json_type(), JsonType::Null]),
        );
        if let Some(format) = self.format() {
            prop.insert("format".to_string(), json!(format));
        }
        JsonValue::Object(prop)
    }
}

/// A named, typed property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub property_type: PropertyType,
}

/// Ordered list of declared properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    properties: Vec<Property>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from `(name, type)` pairs, keeping their order
    pub fn from_fields(fields: &[(&str, PropertyType)]) -> Self {
        fields
            .iter()
            .fold(Self::new(), |schema, (name, ty)| schema.with_property(*name, *ty))
    }

    /// Add a property. Redeclaring a name replaces its type in place.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, property_type: PropertyType) -> Self {
        let name = name.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.property_type = property_type,
            None => self.properties.push(Property {
                name,
                property_type,
            }),
        }
        self
    }

    /// Declared properties in order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Property names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Look up a property type
    pub fn get(&self, name: &str) -> Option<PropertyType> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.property_type)
    }

    /// Check if a property is declared
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the schema declares nothing
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Render as a JSON Schema document
    pub fn to_json_schema(&self) -> JsonValue {
        let properties: JsonObject = self
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.property_type.to_json_schema()))
            .collect();

        json!({
            "type": ["object", "null"],
            "additionalProperties": false,
            "properties": properties,
        })
    }

    /// Conform a raw API object to this schema
    ///
    /// Output keys follow declaration order.
    pub fn conform(&self, raw: &JsonValue) -> Result<Record> {
        let JsonValue::Object(object) = raw else {
            return Err(Error::decode(format!(
                "expected a JSON object record, got {}",
                type_name(raw)
            )));
        };
        Ok(self.conform_object(object))
    }

    /// Conform an already-validated object
    pub fn conform_object(&self, object: &JsonObject) -> Record {
        let mut record = Record::new();
        for prop in &self.properties {
            let Some(value) = object.get(&prop.name) else {
                continue;
            };
            let conformed = coerce_value(value, prop.property_type).unwrap_or_else(|| {
                warn!(
                    field = %prop.name,
                    expected = %prop.property_type.json_type(),
                    actual = type_name(value),
                    "Value does not match declared type, emitting null"
                );
                JsonValue::Null
            });
            record.insert(prop.name.clone(), conformed);
        }
        record
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
