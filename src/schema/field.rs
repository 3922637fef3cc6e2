use gcp_bigquery_client::model::field_type::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar kind a query parameter or result column is declared with.
///
/// Anything that is not one of the four core kinds is kept as `Other`:
/// it binds like a string and projects as an untouched pass-through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScalarType {
    Integer,
    Float,
    Boolean,
    String,
    Other(String),
}

impl ScalarType {
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "INTEGER" | "INT64" => ScalarType::Integer,
            "FLOAT" | "FLOAT64" => ScalarType::Float,
            "BOOLEAN" | "BOOL" => ScalarType::Boolean,
            "STRING" => ScalarType::String,
            _ => ScalarType::Other(upper),
        }
    }

    /// Standard SQL type name used when submitting a parameter.
    pub fn bigquery_name(&self) -> &'static str {
        match self {
            ScalarType::Integer => "INT64",
            ScalarType::Float => "FLOAT64",
            ScalarType::Boolean => "BOOL",
            ScalarType::String | ScalarType::Other(_) => "STRING",
        }
    }

    pub fn from_field_type(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Integer | FieldType::Int64 => ScalarType::Integer,
            FieldType::Float | FieldType::Float64 => ScalarType::Float,
            FieldType::Boolean | FieldType::Bool => ScalarType::Boolean,
            FieldType::String => ScalarType::String,
            other => ScalarType::Other(format!("{:?}", other).to_uppercase()),
        }
    }
}

impl Default for ScalarType {
    fn default() -> Self {
        ScalarType::String
    }
}

impl From<String> for ScalarType {
    fn from(s: String) -> Self {
        ScalarType::parse(&s)
    }
}

impl From<ScalarType> for String {
    fn from(t: ScalarType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Integer => write!(f, "INTEGER"),
            ScalarType::Float => write!(f, "FLOAT"),
            ScalarType::Boolean => write!(f, "BOOLEAN"),
            ScalarType::String => write!(f, "STRING"),
            ScalarType::Other(name) => write!(f, "{}", name),
        }
    }
}
