use crate::error::{BqServeError, Result};
use crate::schema::ScalarType;
use gcp_bigquery_client::model::query_parameter::QueryParameter;
use gcp_bigquery_client::model::query_parameter_type::QueryParameterType;
use gcp_bigquery_client::model::query_parameter_value::QueryParameterValue;
use std::collections::{BTreeMap, HashMap};

/// Query-string values as received, keyed by parameter name.
pub type RawParams = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl ParamValue {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ParamValue::Integer(_) => ScalarType::Integer,
            ParamValue::Float(_) => ScalarType::Float,
            ParamValue::Boolean(_) => ScalarType::Boolean,
            ParamValue::String(_) => ScalarType::String,
        }
    }

    /// Textual form BigQuery expects in a parameter value.
    pub fn to_bigquery_value(&self) -> String {
        match self {
            ParamValue::Integer(v) => v.to_string(),
            ParamValue::Float(v) if v.is_nan() => "NaN".to_string(),
            ParamValue::Float(v) if v.is_infinite() && *v > 0.0 => "Infinity".to_string(),
            ParamValue::Float(v) if v.is_infinite() => "-Infinity".to_string(),
            ParamValue::Float(v) => v.to_string(),
            ParamValue::Boolean(v) => v.to_string(),
            ParamValue::String(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    pub name: String,
    pub value: ParamValue,
}

impl ParameterBinding {
    pub fn new(name: impl Into<String>, value: ParamValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn to_query_parameter(&self) -> QueryParameter {
        QueryParameter {
            name: Some(self.name.clone()),
            parameter_type: Some(QueryParameterType {
                array_type: None,
                struct_types: None,
                r#type: self.value.scalar_type().bigquery_name().to_string(),
            }),
            parameter_value: Some(QueryParameterValue {
                array_values: None,
                struct_values: None,
                value: Some(self.value.to_bigquery_value()),
            }),
        }
    }
}

/// Converts raw query-string values into typed bindings, one per declared
/// parameter, ordered by name.
///
/// Only the first value supplied for a name is used. A missing value is
/// treated as the empty string, which is a valid `String`, is `false` as a
/// `Boolean`, and fails to parse as an `Integer` or `Float`. The first parse
/// failure aborts the whole binding.
pub fn bind(
    param_types: &BTreeMap<String, ScalarType>,
    raw_values: &RawParams,
) -> Result<Vec<ParameterBinding>> {
    param_types
        .iter()
        .map(|(name, scalar_type)| {
            let raw = raw_values
                .get(name)
                .and_then(|values| values.first())
                .map(String::as_str)
                .unwrap_or("");
            let value = coerce(name, scalar_type, raw)?;
            Ok(ParameterBinding::new(name.clone(), value))
        })
        .collect()
}

fn coerce(name: &str, scalar_type: &ScalarType, raw: &str) -> Result<ParamValue> {
    match scalar_type {
        ScalarType::Integer => raw
            .parse::<i64>()
            .map(ParamValue::Integer)
            .map_err(|e| BqServeError::invalid_parameter(name, format!("{:?}: {}", raw, e))),
        ScalarType::Float => {
            let value = raw
                .parse::<f64>()
                .map_err(|e| BqServeError::invalid_parameter(name, format!("{:?}: {}", raw, e)))?;
            if value.is_infinite() && !is_infinity_literal(raw) {
                return Err(BqServeError::invalid_parameter(
                    name,
                    format!("{:?}: value out of range", raw),
                ));
            }
            Ok(ParamValue::Float(value))
        }
        ScalarType::Boolean => Ok(ParamValue::Boolean(raw == "true")),
        ScalarType::String | ScalarType::Other(_) => Ok(ParamValue::String(raw.to_string())),
    }
}

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
