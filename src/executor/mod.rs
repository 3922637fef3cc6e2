mod bq_executor;
mod client;
mod engine;
mod mock;

pub use bq_executor::{
    create_bigquery_executor, create_executor, create_mock_executor, ExecutorMode,
};
pub use client::BqClient;
pub use engine::{QueryEngine, RowStream};
pub use mock::{MockCall, MockEngine, MockQuery};
