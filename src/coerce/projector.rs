use crate::error::{BqServeError, Result};
use crate::schema::{ColumnSchema, ScalarType};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// One engine result row. A missing key and `Value::Null` both mean SQL NULL.
pub type RawRow = HashMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectedValue {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    /// Value of a column whose type has no dedicated decoding.
    Raw(Value),
}

/// A decoded row whose columns keep the order of the result schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedRow {
    columns: Vec<(String, ProjectedValue)>,
}

impl ProjectedRow {
    pub fn get(&self, column: &str) -> Option<&ProjectedValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for ProjectedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Decodes `row` column by column in schema order.
///
/// Columns absent from the row come out as explicit nulls. A value that does
/// not decode as its declared type fails the whole row.
pub fn project(schema: &ColumnSchema, row: &RawRow) -> Result<ProjectedRow> {
    let columns = schema
        .iter()
        .map(|column| {
            let value = match row.get(&column.name) {
                None | Some(Value::Null) => ProjectedValue::Null,
                Some(value) => decode(&column.name, &column.scalar_type, value)?,
            };
            Ok((column.name.clone(), value))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ProjectedRow { columns })
}

// BigQuery's REST encoding carries INT64, FLOAT64 and BOOL cells as JSON
// strings, so both that form and the native JSON scalar are accepted.
fn decode(column: &str, scalar_type: &ScalarType, value: &Value) -> Result<ProjectedValue> {
    let mismatch = || {
        BqServeError::projection(
            column,
            scalar_type,
            format!("unexpected value {}", value),
        )
    };

    match scalar_type {
        ScalarType::Integer => match value {
            Value::Number(n) => n.as_i64().map(ProjectedValue::Integer).ok_or_else(mismatch),
            Value::String(s) => s
                .parse::<i64>()
                .map(ProjectedValue::Integer)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ScalarType::Float => match value {
            Value::Number(n) => n.as_f64().map(ProjectedValue::Float).ok_or_else(mismatch),
            Value::String(s) => s
                .parse::<f64>()
                .map(ProjectedValue::Float)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        ScalarType::Boolean => match value {
            Value::Bool(b) => Ok(ProjectedValue::Boolean(*b)),
            Value::String(s) if s == "true" => Ok(ProjectedValue::Boolean(true)),
            Value::String(s) if s == "false" => Ok(ProjectedValue::Boolean(false)),
            _ => Err(mismatch()),
        },
        ScalarType::String => match value {
            Value::String(s) => Ok(ProjectedValue::String(s.clone())),
            _ => Err(mismatch()),
        },
        ScalarType::Other(_) => Ok(ProjectedValue::Raw(value.clone())),
    }
}
