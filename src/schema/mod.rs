mod field;
mod table;

pub use field::ScalarType;
pub use table::{Column, ColumnSchema};
