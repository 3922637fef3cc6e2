use crate::schema::ScalarType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One administrator-defined query, exposed under its `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDef {
    pub name: String,
    #[serde(rename = "query", alias = "sql")]
    pub sql: String,
    /// Named parameters the SQL expects. Kept sorted so binding order is stable.
    #[serde(default)]
    pub parameters: BTreeMap<String, ScalarType>,
}

impl QueryDef {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, scalar_type: ScalarType) -> Self {
        self.parameters.insert(name.into(), scalar_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_list() {
        let yaml = r#"
- name: param
  query: "SELECT * FROM UNNEST([(@name, @id)]);"
  parameters:
    name: STRING
    id: FLOAT
- name: static
  query: "SELECT 1 AS one"
"#;
        let defs: Vec<QueryDef> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].parameters.get("id"), Some(&ScalarType::Float));
        assert_eq!(defs[0].parameters.get("name"), Some(&ScalarType::String));
        assert!(defs[1].parameters.is_empty());
    }

    #[test]
    fn test_sql_alias() {
        let def: QueryDef = serde_yaml::from_str("name: q\nsql: SELECT 1").unwrap();
        assert_eq!(def.sql, "SELECT 1");
    }
}
