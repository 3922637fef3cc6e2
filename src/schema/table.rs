use super::field::ScalarType;
use gcp_bigquery_client::model::table_schema::TableSchema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub scalar_type: ScalarType,
}

impl Column {
    pub fn new(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar_type,
        }
    }
}

/// Ordered result columns of one query execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSchema {
    pub columns: Vec<Column>,
}

impl ColumnSchema {
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn from_table_schema(schema: &TableSchema) -> Self {
        let columns = schema
            .fields
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|f| Column::new(f.name.clone(), ScalarType::from_field_type(&f.r#type)))
            .collect();
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, ScalarType)> for ColumnSchema {
    fn from_iter<I: IntoIterator<Item = (S, ScalarType)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, t)| Column::new(name, t))
                .collect(),
        }
    }
}
