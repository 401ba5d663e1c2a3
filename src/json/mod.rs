//! JSON value model, recursive-descent parser, and serializer.
//! One parser serves both configuration documents and structured data; the
//! value model is a closed tagged union with typed accessors.

pub mod parser;
pub mod writer;

use std::collections::HashMap;

/// A parsed JSON value.
///
/// Numbers are stored as 64-bit floats with no separate integer
/// representation. Object members live in an unordered map; member order is
/// not preserved across a round trip (the serializer sorts keys instead).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(HashMap<String, JsonValue>),
}

impl JsonValue {
    /// Parses a JSON document.
    pub fn parse(text: &str) -> Result<JsonValue, parser::JsonError> {
        parser::JsonParser::new(text).parse()
    }

    /// Looks up an object member. Returns None for non-objects.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(members) => members.get(key),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(elements) => Some(elements.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, JsonValue>> {
        match self {
            JsonValue::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Convenience accessor for a string-valued object member.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(JsonValue::as_str)
    }

    /// Convenience accessor for a boolean-valued object member.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(JsonValue::as_bool)
    }
}
