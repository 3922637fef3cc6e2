use super::client::BqClient;
use super::engine::QueryEngine;
use super::mock::MockEngine;
use crate::error::{BqServeError, Result};
use clap::ValueEnum;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum ExecutorMode {
    Mock,
    #[value(name = "bigquery")]
    BigQuery,
}

/// Builds the engine for `mode`. BigQuery requires a non-empty project.
pub async fn create_executor(
    mode: ExecutorMode,
    project_id: &str,
    credentials: Option<&str>,
) -> Result<Arc<dyn QueryEngine>> {
    match mode {
        ExecutorMode::Mock => Ok(create_mock_executor()),
        ExecutorMode::BigQuery => {
            if project_id.trim().is_empty() {
                return Err(BqServeError::Validation("Empty project flag".to_string()));
            }
            create_bigquery_executor(project_id, credentials).await
        }
    }
}

/// Connects to BigQuery with a service-account key file when given,
/// otherwise with application-default credentials.
pub async fn create_bigquery_executor(
    project_id: &str,
    credentials: Option<&str>,
) -> Result<Arc<dyn QueryEngine>> {
    let client = match credentials {
        Some(key_file) => {
            info!(project = %project_id, key_file = %key_file, "Connecting to BigQuery with service account");
            BqClient::from_service_account_key_file(project_id, key_file).await?
        }
        None => {
            info!(project = %project_id, "Connecting to BigQuery with application default credentials");
            BqClient::from_application_default_credentials(project_id).await?
        }
    };
    Ok(Arc::new(client))
}

pub fn create_mock_executor() -> Arc<dyn QueryEngine> {
    info!("Using mock executor");
    Arc::new(MockEngine::new())
}
