mod binder;
mod projector;

pub use binder::{bind, ParamValue, ParameterBinding, RawParams};
pub use projector::{project, ProjectedRow, ProjectedValue, RawRow};
