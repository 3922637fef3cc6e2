use super::config::ServerConfig;
use super::dispatch::Dispatcher;
use crate::coerce::RawParams;
use crate::error::{BqServeError, Result};
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
    url_path: Arc<str>,
}

/// Every path below the configured prefix names a query; the remainder of
/// the path is the query name.
pub fn router(config: &ServerConfig, dispatcher: Arc<Dispatcher>) -> Router {
    let state = AppState {
        dispatcher,
        url_path: Arc::from(config.url_path()),
    };
    Router::new()
        .fallback(handle_query)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn handle_query(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(encoded) = uri.path().strip_prefix(state.url_path.as_ref()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Ok(decoded) = urlencoding::decode(encoded) else {
        warn!(path = %uri.path(), "Query name is not valid UTF-8");
        return StatusCode::NOT_FOUND.into_response();
    };
    let name = decoded.as_ref();

    let raw_params = match parse_query_string(uri.query()) {
        Ok(params) => params,
        Err(e) => {
            warn!(query = %name, error = %e, "Malformed query string");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match state.dispatcher.dispatch(name, &raw_params).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                error!(query = %name, error = %e, "Query failed");
            } else {
                warn!(query = %name, error = %e, "Query rejected");
            }
            status.into_response()
        }
    }
}

/// Groups query-string pairs by key, keeping every value in arrival order.
pub fn parse_query_string(query: Option<&str>) -> Result<RawParams> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.unwrap_or(""))
        .map_err(|e| BqServeError::invalid_parameter("<query string>", e))?;

    let mut params = RawParams::new();
    for (key, value) in pairs {
        params.entry(key).or_default().push(value);
    }
    Ok(params)
}

impl BqServeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BqServeError::UnknownQuery(_) => StatusCode::NOT_FOUND,
            BqServeError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string_multi_values() {
        let params = parse_query_string(Some("name=bravo&id=1.5&id=2&empty=")).unwrap();
        assert_eq!(params["name"], vec!["bravo".to_string()]);
        assert_eq!(params["id"], vec!["1.5".to_string(), "2".to_string()]);
        assert_eq!(params["empty"], vec![String::new()]);
    }

    #[test]
    fn test_parse_query_string_decodes() {
        let params = parse_query_string(Some("q=hello%20world&plus=a+b")).unwrap();
        assert_eq!(params["q"], vec!["hello world".to_string()]);
        assert_eq!(params["plus"], vec!["a b".to_string()]);
    }

    #[test]
    fn test_parse_query_string_absent() {
        assert!(parse_query_string(None).unwrap().is_empty());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            BqServeError::UnknownQuery("q".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BqServeError::invalid_parameter("id", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BqServeError::EngineExecution("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            BqServeError::projection("c", "INTEGER", "bad").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
