use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    ValidationError,
    ConversionError,
    LookupError,
    PathError,
    SerializationError,
    IoError,
    InternalError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Concrete value types a schema can declare for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Any,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Any => "any",
        }
    }

    /// Runtime type of a parsed document value. `null` has no field type.
    pub fn of(value: &Value) -> Option<FieldType> {
        match value {
            Value::String(_) => Some(FieldType::String),
            Value::Number(_) => Some(FieldType::Number),
            Value::Bool(_) => Some(FieldType::Boolean),
            Value::Object(_) => Some(FieldType::Object),
            Value::Array(_) => Some(FieldType::Array),
            Value::Null => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "string" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "object" => Ok(FieldType::Object),
            "array" => Ok(FieldType::Array),
            "any" => Ok(FieldType::Any),
            other => Err(format!(
                "unknown field type '{}'; supported values are string, number, boolean, object, array, any",
                other
            )),
        }
    }
}

/// Key spelling used when rendering path expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
    #[default]
    Plain,
    Camel,
}

impl fmt::Display for KeyCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCase::Plain => write!(f, "plain"),
            KeyCase::Camel => write!(f, "camel"),
        }
    }
}

impl FromStr for KeyCase {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "plain" | "snake" => Ok(KeyCase::Plain),
            "camel" => Ok(KeyCase::Camel),
            other => Err(format!(
                "invalid key case '{}'; supported values are plain, camel",
                other
            )),
        }
    }
}
