mod loader;
mod parser;
mod registry;
mod validator;

pub use loader::QueryLoader;
pub use parser::QueryDef;
pub use registry::QueryRegistry;
pub use validator::{extract_placeholders, QueryValidator, ValidationResult, ValidationWarning};
