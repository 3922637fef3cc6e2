use thiserror::Error;

#[derive(Error, Debug)]
pub enum BqServeError {
    #[error("Query not found: {0}")]
    UnknownQuery(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Query execution failed: {0}")]
    EngineExecution(String),

    #[error("Column '{column}' is not a valid {expected}: {reason}")]
    Projection {
        column: String,
        expected: String,
        reason: String,
    },

    #[error("DSL parse error: {0}")]
    DslParse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BqServeError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn projection(
        column: impl Into<String>,
        expected: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::Projection {
            column: column.into(),
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<gcp_bigquery_client::error::BQError> for BqServeError {
    fn from(err: gcp_bigquery_client::error::BQError) -> Self {
        Self::EngineExecution(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BqServeError>;
