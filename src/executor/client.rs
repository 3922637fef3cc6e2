use super::engine::{QueryEngine, RowStream};
use crate::coerce::{ParameterBinding, RawRow};
use crate::error::{BqServeError, Result};
use crate::schema::ColumnSchema;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use gcp_bigquery_client::model::get_query_results_parameters::GetQueryResultsParameters;
use gcp_bigquery_client::model::get_query_results_response::GetQueryResultsResponse;
use gcp_bigquery_client::model::job_reference::JobReference;
use gcp_bigquery_client::model::query_request::QueryRequest;
use gcp_bigquery_client::model::query_response::QueryResponse;
use gcp_bigquery_client::model::table_row::TableRow;
use gcp_bigquery_client::model::table_schema::TableSchema;
use gcp_bigquery_client::Client;
use serde_json::Value;
use tracing::debug;

#[derive(Clone)]
pub struct BqClient {
    client: Client,
    project_id: String,
}

impl BqClient {
    pub fn new(client: Client, project_id: impl Into<String>) -> Self {
        Self {
            client,
            project_id: project_id.into(),
        }
    }

    pub async fn from_service_account_key_file(
        project_id: impl Into<String>,
        key_file: &str,
    ) -> Result<Self> {
        let client = Client::from_service_account_key_file(key_file).await?;
        Ok(Self::new(client, project_id))
    }

    pub async fn from_application_default_credentials(project_id: impl Into<String>) -> Result<Self> {
        let client = Client::from_application_default_credentials().await?;
        Ok(Self::new(client, project_id))
    }

    fn build_request(sql: &str, bindings: &[ParameterBinding]) -> QueryRequest {
        let mut request = QueryRequest::new(sql);
        if !bindings.is_empty() {
            request.parameter_mode = Some("NAMED".to_string());
            request.query_parameters = Some(
                bindings
                    .iter()
                    .map(ParameterBinding::to_query_parameter)
                    .collect(),
            );
        }
        request
    }

    async fn fetch_page(&self, job: &JobHandle, page_token: Option<String>) -> Result<Page> {
        let parameters = GetQueryResultsParameters {
            location: job.location.clone(),
            page_token,
            ..Default::default()
        };
        let response = self
            .client
            .job()
            .get_query_results(&self.project_id, &job.job_id, parameters)
            .await?;
        Ok(Page::from(response))
    }
}

#[async_trait]
impl QueryEngine for BqClient {
    async fn run(&self, sql: &str, bindings: &[ParameterBinding]) -> Result<RowStream> {
        let request = Self::build_request(sql, bindings);
        let response = self.client.job().query(&self.project_id, request).await?;
        let mut page = Page::from(response);

        let job = page.job_reference.as_ref().and_then(JobHandle::from_reference);

        while !page.complete {
            let job = job.as_ref().ok_or_else(|| {
                BqServeError::EngineExecution("Incomplete query job has no job id".to_string())
            })?;
            debug!(job_id = %job.job_id, "Waiting for query job to complete");
            page = self.fetch_page(job, None).await?;
        }

        let schema = page
            .schema
            .as_ref()
            .map(ColumnSchema::from_table_schema)
            .unwrap_or_default();

        let first_rows = decode_rows(&schema, page.rows);
        let cursor = match (job, page.page_token) {
            (Some(job), Some(token)) => Some(PageCursor {
                client: self.clone(),
                job,
                page_token: token,
                schema: schema.clone(),
            }),
            _ => None,
        };

        let remaining = stream::try_unfold(cursor, next_page)
            .map_ok(|rows| stream::iter(rows.into_iter().map(Ok::<RawRow, BqServeError>)))
            .try_flatten();

        Ok(RowStream {
            schema,
            rows: stream::iter(first_rows.into_iter().map(Ok::<RawRow, BqServeError>))
                .chain(remaining)
                .boxed(),
        })
    }
}

#[derive(Clone)]
struct JobHandle {
    job_id: String,
    location: Option<String>,
}

impl JobHandle {
    fn from_reference(reference: &JobReference) -> Option<Self> {
        Some(Self {
            job_id: reference.job_id.clone()?,
            location: reference.location.clone(),
        })
    }
}

struct PageCursor {
    client: BqClient,
    job: JobHandle,
    page_token: String,
    schema: ColumnSchema,
}

async fn next_page(cursor: Option<PageCursor>) -> Result<Option<(Vec<RawRow>, Option<PageCursor>)>> {
    let Some(mut cursor) = cursor else {
        return Ok(None);
    };
    let page = cursor
        .client
        .fetch_page(&cursor.job, Some(cursor.page_token.clone()))
        .await?;
    debug!(job_id = %cursor.job.job_id, rows = page.rows.len(), "Fetched result page");

    let rows = decode_rows(&cursor.schema, page.rows);
    let next = page.page_token.map(|token| {
        cursor.page_token = token;
        cursor
    });
    Ok(Some((rows, next)))
}

struct Page {
    schema: Option<TableSchema>,
    rows: Vec<TableRow>,
    page_token: Option<String>,
    complete: bool,
    job_reference: Option<JobReference>,
}

impl From<QueryResponse> for Page {
    fn from(response: QueryResponse) -> Self {
        Self {
            schema: response.schema,
            rows: response.rows.unwrap_or_default(),
            page_token: response.page_token,
            complete: response.job_complete.unwrap_or(true),
            job_reference: response.job_reference,
        }
    }
}

impl From<GetQueryResultsResponse> for Page {
    fn from(response: GetQueryResultsResponse) -> Self {
        Self {
            schema: response.schema,
            rows: response.rows.unwrap_or_default(),
            page_token: response.page_token,
            complete: response.job_complete.unwrap_or(true),
            job_reference: response.job_reference,
        }
    }
}

// Cells arrive positionally in schema order.
fn decode_rows(schema: &ColumnSchema, rows: Vec<TableRow>) -> Vec<RawRow> {
    rows.into_iter()
        .map(|row| {
            let cells = row.columns.unwrap_or_default();
            schema
                .iter()
                .zip(cells)
                .map(|(column, cell)| (column.name.clone(), cell.value.unwrap_or(Value::Null)))
                .collect()
        })
        .collect()
}
