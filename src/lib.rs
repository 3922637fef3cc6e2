pub mod coerce;
pub mod dsl;
pub mod error;
pub mod executor;
pub mod schema;
pub mod server;

pub use coerce::{
    bind, project, ParamValue, ParameterBinding, ProjectedRow, ProjectedValue, RawParams, RawRow,
};
pub use dsl::{QueryDef, QueryLoader, QueryRegistry, QueryValidator, ValidationResult};
pub use error::{BqServeError, Result};
pub use executor::{
    create_bigquery_executor, create_executor, create_mock_executor, BqClient, ExecutorMode,
    MockEngine, MockQuery, QueryEngine, RowStream,
};
pub use schema::{Column, ColumnSchema, ScalarType};
pub use server::{serve, Dispatcher, ServerConfig};
