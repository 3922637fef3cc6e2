use super::parser::QueryDef;
use super::validator::QueryValidator;
use crate::error::{BqServeError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct QueryLoader {
    validator: QueryValidator,
}

impl QueryLoader {
    pub fn new() -> Self {
        Self {
            validator: QueryValidator::new(),
        }
    }

    /// Loads a file, or every `*.yaml`/`*.yml` file below a directory.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<QueryDef>> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_dir(path)
        } else {
            self.load_file(path)
        }
    }

    pub fn load_dir(&self, path: impl AsRef<Path>) -> Result<Vec<QueryDef>> {
        let path = path.as_ref();
        let mut files: Vec<PathBuf> = Vec::new();
        for extension in ["yaml", "yml"] {
            let pattern = format!("{}/**/*.{}", path.display(), extension);
            let entries =
                glob::glob(&pattern).map_err(|e| BqServeError::DslParse(e.to_string()))?;
            files.extend(entries.filter_map(|entry| entry.ok()));
        }
        files.sort();

        let mut queries = Vec::new();
        for file in files {
            queries.extend(self.load_file(&file)?);
        }
        Ok(queries)
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<QueryDef>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let queries = self
            .parse(&content)
            .map_err(|e| BqServeError::DslParse(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), count = queries.len(), "Loaded query file");
        Ok(queries)
    }

    pub fn parse(&self, content: &str) -> Result<Vec<QueryDef>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let queries: Vec<QueryDef> = serde_yaml::from_str(content)?;

        for query in &queries {
            let result = self.validator.validate(query);
            if let Some(error) = result.errors.first() {
                return Err(BqServeError::Validation(format!(
                    "Query '{}': {}",
                    query.name, error
                )));
            }
            for warning in &result.warnings {
                warn!(query = %query.name, "{}", warning);
            }
        }
        Ok(queries)
    }
}

impl Default for QueryLoader {
    fn default() -> Self {
        Self::new()
    }
}
