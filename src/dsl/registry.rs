use super::parser::QueryDef;
use std::collections::HashMap;
use tracing::warn;

/// Read-only lookup of query definitions by name, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct QueryRegistry {
    queries: HashMap<String, QueryDef>,
}

impl QueryRegistry {
    /// Later definitions replace earlier ones with the same name.
    pub fn new(queries: impl IntoIterator<Item = QueryDef>) -> Self {
        let mut map = HashMap::new();
        for query in queries {
            if let Some(previous) = map.insert(query.name.clone(), query) {
                warn!(query = %previous.name, "Duplicate query name, keeping the last definition");
            }
        }
        Self { queries: map }
    }

    pub fn get(&self, name: &str) -> Option<&QueryDef> {
        self.queries.get(name)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.queries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let registry = QueryRegistry::new(vec![
            QueryDef::new("a", "SELECT 1"),
            QueryDef::new("b", "SELECT 2"),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("b").unwrap().sql, "SELECT 2");
        assert!(registry.get("c").is_none());
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let registry = QueryRegistry::new(vec![
            QueryDef::new("a", "SELECT 1"),
            QueryDef::new("a", "SELECT 2"),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().sql, "SELECT 2");
    }
}
