use super::engine::{QueryEngine, RowStream};
use crate::coerce::{ParameterBinding, RawRow};
use crate::error::{BqServeError, Result};
use crate::schema::ColumnSchema;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Mutex;

/// Canned response for one SQL text.
#[derive(Debug, Clone, Default)]
pub struct MockQuery {
    pub schema: ColumnSchema,
    pub rows: Vec<RawRow>,
    pub execution_error: Option<String>,
    /// Fail the row sequence after this many rows have been yielded.
    pub read_error_after: Option<usize>,
}

impl MockQuery {
    pub fn rows(schema: ColumnSchema, rows: Vec<RawRow>) -> Self {
        Self {
            schema,
            rows,
            ..Default::default()
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            execution_error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_read_error_after(mut self, rows: usize) -> Self {
        self.read_error_after = Some(rows);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub sql: String,
    pub bindings: Vec<ParameterBinding>,
}

/// In-memory engine keyed by SQL text. Unknown SQL yields an empty result.
#[derive(Debug, Default)]
pub struct MockEngine {
    queries: HashMap<String, MockQuery>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, sql: impl Into<String>, query: MockQuery) -> Self {
        self.queries.insert(sql.into(), query);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueryEngine for MockEngine {
    async fn run(&self, sql: &str, bindings: &[ParameterBinding]) -> Result<RowStream> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                sql: sql.to_string(),
                bindings: bindings.to_vec(),
            });
        }

        let Some(query) = self.queries.get(sql) else {
            return Ok(RowStream::from_rows(ColumnSchema::default(), Vec::new()));
        };

        if let Some(message) = &query.execution_error {
            return Err(BqServeError::EngineExecution(message.clone()));
        }

        let Some(limit) = query.read_error_after else {
            return Ok(RowStream::from_rows(query.schema.clone(), query.rows.clone()));
        };

        let rows: Vec<Result<RawRow>> = query
            .rows
            .iter()
            .take(limit)
            .cloned()
            .map(Ok)
            .chain(std::iter::once(Err(BqServeError::EngineExecution(
                "Result read failed".to_string(),
            ))))
            .collect();

        Ok(RowStream {
            schema: query.schema.clone(),
            rows: stream::iter(rows).boxed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScalarType;
    use futures::TryStreamExt;
    use serde_json::json;

    fn schema() -> ColumnSchema {
        vec![("id", ScalarType::Integer)].into_iter().collect()
    }

    fn rows(n: i64) -> Vec<RawRow> {
        (0..n)
            .map(|i| RawRow::from([("id".to_string(), json!(i))]))
            .collect()
    }

    #[tokio::test]
    async fn test_mock_returns_rows_and_records_calls() {
        let engine = MockEngine::new().with_query("SELECT id", MockQuery::rows(schema(), rows(3)));
        let result = engine.run("SELECT id", &[]).await.unwrap();
        assert_eq!(result.schema, schema());

        let collected: Vec<RawRow> = result.rows.try_collect().await.unwrap();
        assert_eq!(collected.len(), 3);
        assert_eq!(engine.calls().len(), 1);
        assert_eq!(engine.calls()[0].sql, "SELECT id");
    }

    #[tokio::test]
    async fn test_mock_execution_error() {
        let engine = MockEngine::new().with_query("BAD", MockQuery::failing("syntax error"));
        let err = engine.run("BAD", &[]).await.unwrap_err();
        assert!(matches!(err, BqServeError::EngineExecution(_)));
    }

    #[tokio::test]
    async fn test_mock_read_error() {
        let engine = MockEngine::new().with_query(
            "SELECT id",
            MockQuery::rows(schema(), rows(5)).with_read_error_after(2),
        );
        let result = engine.run("SELECT id", &[]).await.unwrap();
        let collected: Result<Vec<RawRow>> = result.rows.try_collect().await;
        assert!(collected.is_err());
    }

    #[tokio::test]
    async fn test_mock_unknown_sql_is_empty() {
        let result = MockEngine::new().run("SELECT 1", &[]).await.unwrap();
        assert!(result.schema.is_empty());
        let collected: Vec<RawRow> = result.rows.try_collect().await.unwrap();
        assert!(collected.is_empty());
    }
}
