use crate::coerce::{ParameterBinding, RawRow};
use crate::error::{BqServeError, Result};
use crate::schema::ColumnSchema;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::fmt;

/// Result of one query execution: the column schema and a lazy,
/// non-restartable sequence of rows.
pub struct RowStream {
    pub schema: ColumnSchema,
    pub rows: BoxStream<'static, Result<RawRow>>,
}

impl RowStream {
    pub fn from_rows(schema: ColumnSchema, rows: Vec<RawRow>) -> Self {
        Self {
            schema,
            rows: futures::stream::iter(rows.into_iter().map(Ok::<RawRow, BqServeError>)).boxed(),
        }
    }
}

impl fmt::Debug for RowStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStream")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn run(&self, sql: &str, bindings: &[ParameterBinding]) -> Result<RowStream>;
}
