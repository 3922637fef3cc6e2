use crate::coerce::{bind, project, ProjectedRow, RawParams};
use crate::dsl::QueryRegistry;
use crate::error::{BqServeError, Result};
use crate::executor::{QueryEngine, RowStream};
use futures::TryStreamExt;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves a query by name, binds its parameters, runs it and projects
/// every result row.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<QueryRegistry>,
    engine: Arc<dyn QueryEngine>,
}

impl Dispatcher {
    pub fn new(registry: QueryRegistry, engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            registry: Arc::new(registry),
            engine,
        }
    }

    pub async fn dispatch(&self, name: &str, raw_params: &RawParams) -> Result<Vec<ProjectedRow>> {
        let query = self
            .registry
            .get(name)
            .ok_or_else(|| BqServeError::UnknownQuery(name.to_string()))?;

        let bindings = bind(&query.parameters, raw_params)?;
        debug!(query = %name, parameters = bindings.len(), "Bound query parameters");

        let RowStream { schema, mut rows } = self.engine.run(&query.sql, &bindings).await?;

        let mut projected = Vec::new();
        while let Some(row) = rows.try_next().await? {
            projected.push(project(&schema, &row)?);
        }

        info!(query = %name, rows = projected.len(), "Query served");
        Ok(projected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::{ParamValue, ParameterBinding, ProjectedValue, RawRow};
    use crate::dsl::QueryDef;
    use crate::executor::{MockEngine, MockQuery};
    use crate::schema::{ColumnSchema, ScalarType};
    use serde_json::json;

    const PARAM_SQL: &str = "SELECT * FROM UNNEST([(@name, @id)]);";
    const STATIC_SQL: &str = "SELECT * FROM UNNEST([(1, 'a'), (2, 'b')]);";

    fn schema() -> ColumnSchema {
        vec![("id", ScalarType::Integer), ("name", ScalarType::String)]
            .into_iter()
            .collect()
    }

    fn row(value: serde_json::Value) -> RawRow {
        serde_json::from_value(value).unwrap()
    }

    fn registry() -> QueryRegistry {
        QueryRegistry::new(vec![
            QueryDef::new("param", PARAM_SQL)
                .with_parameter("name", ScalarType::String)
                .with_parameter("id", ScalarType::Float),
            QueryDef::new("static", STATIC_SQL),
        ])
    }

    fn raw(pairs: &[(&str, &str)]) -> RawParams {
        let mut params = RawParams::new();
        for (k, v) in pairs {
            params.entry(k.to_string()).or_default().push(v.to_string());
        }
        params
    }

    fn dispatcher(engine: MockEngine) -> (Dispatcher, Arc<MockEngine>) {
        let engine = Arc::new(engine);
        (Dispatcher::new(registry(), engine.clone()), engine)
    }

    #[tokio::test]
    async fn test_dispatch_binds_sorted_parameters() {
        let (dispatcher, engine) = dispatcher(MockEngine::new());
        dispatcher
            .dispatch("param", &raw(&[("name", "bravo"), ("id", "1.5")]))
            .await
            .unwrap();

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].sql, PARAM_SQL);
        assert_eq!(
            calls[0].bindings,
            vec![
                ParameterBinding::new("id", ParamValue::Float(1.5)),
                ParameterBinding::new("name", ParamValue::String("bravo".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_dispatch_static_query_ignores_params() {
        let (dispatcher, engine) = dispatcher(MockEngine::new().with_query(
            STATIC_SQL,
            MockQuery::rows(
                schema(),
                vec![
                    row(json!({"id": "1", "name": "a"})),
                    row(json!({"id": "2", "name": "b"})),
                ],
            ),
        ));

        let rows = dispatcher
            .dispatch("static", &raw(&[("id", "nonsense")]))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("id"), Some(&ProjectedValue::Integer(2)));
        assert!(engine.calls()[0].bindings.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_query_skips_engine() {
        let (dispatcher, engine) = dispatcher(MockEngine::new());
        let err = dispatcher.dispatch("missing", &RawParams::new()).await.unwrap_err();
        assert!(matches!(err, BqServeError::UnknownQuery(ref n) if n == "missing"));
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_parameter_skips_engine() {
        let (dispatcher, engine) = dispatcher(MockEngine::new());
        let err = dispatcher
            .dispatch("param", &raw(&[("name", "bravo"), ("id", "abc")]))
            .await
            .unwrap_err();
        assert!(matches!(err, BqServeError::InvalidParameter { ref name, .. } if name == "id"));
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_engine_error_propagates() {
        let (dispatcher, _) =
            dispatcher(MockEngine::new().with_query(STATIC_SQL, MockQuery::failing("quota")));
        let err = dispatcher.dispatch("static", &RawParams::new()).await.unwrap_err();
        assert!(matches!(err, BqServeError::EngineExecution(_)));
    }

    #[tokio::test]
    async fn test_read_error_aborts_result_set() {
        let (dispatcher, _) = dispatcher(MockEngine::new().with_query(
            STATIC_SQL,
            MockQuery::rows(schema(), vec![row(json!({"id": 1, "name": "a"}))])
                .with_read_error_after(1),
        ));
        let err = dispatcher.dispatch("static", &RawParams::new()).await.unwrap_err();
        assert!(matches!(err, BqServeError::EngineExecution(_)));
    }

    #[tokio::test]
    async fn test_projection_error_aborts_result_set() {
        let (dispatcher, _) = dispatcher(MockEngine::new().with_query(
            STATIC_SQL,
            MockQuery::rows(
                schema(),
                vec![
                    row(json!({"id": 1, "name": "a"})),
                    row(json!({"id": "two", "name": "b"})),
                ],
            ),
        ));
        let err = dispatcher.dispatch("static", &RawParams::new()).await.unwrap_err();
        assert!(matches!(err, BqServeError::Projection { ref column, .. } if column == "id"));
    }
}
