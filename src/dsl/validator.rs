use super::parser::QueryDef;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^@])@([A-Za-z_][A-Za-z0-9_]*)")
        .expect("placeholder pattern regex is valid")
});

/// Named `@param` placeholders referenced by the SQL text.
pub fn extract_placeholders(sql: &str) -> BTreeSet<String> {
    PLACEHOLDER_PATTERN
        .captures_iter(sql)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    UnreferencedParameter(String),
    UndeclaredPlaceholder(String),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::UnreferencedParameter(name) => {
                write!(f, "Parameter '{}' is declared but never used in SQL", name)
            }
            ValidationWarning::UndeclaredPlaceholder(name) => {
                write!(f, "Placeholder '@{}' has no declared parameter", name)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct QueryValidator;

impl QueryValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, query: &QueryDef) -> ValidationResult {
        let mut result = ValidationResult::default();

        if query.name.is_empty() {
            result.errors.push("Query name must not be empty".to_string());
        } else if query.name.starts_with('/') || query.name.chars().any(char::is_whitespace) {
            result.errors.push(format!(
                "Query name '{}' must not start with '/' or contain whitespace",
                query.name
            ));
        }

        if query.sql.trim().is_empty() {
            result.errors.push("Query SQL must not be empty".to_string());
            return result;
        }

        let placeholders = extract_placeholders(&query.sql);
        for name in query.parameters.keys() {
            if !placeholders.contains(name) {
                result
                    .warnings
                    .push(ValidationWarning::UnreferencedParameter(name.clone()));
            }
        }
        for name in placeholders {
            if !query.parameters.contains_key(&name) {
                result
                    .warnings
                    .push(ValidationWarning::UndeclaredPlaceholder(name));
            }
        }

        result
    }
}

impl Default for QueryValidator {
    fn default() -> Self {
        Self::new()
    }
}
