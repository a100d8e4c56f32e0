//! Read-only schema adapter for the GraphKB structured query layer.
//!
//! The schema itself is supplied externally (populated once by the host process
//! from its own class/property registry); this crate only defines the shape of
//! that data and the lookups the query parser and compiler need against it.

mod cache;
mod class;
mod error;
mod property;
mod schema;

pub use cache::{SchemaCacheRef, SchemaGuard};
pub use class::Class;
pub use error::SchemaError;
pub use property::{CastError, DataType, Property};
pub use schema::Schema;

/// Prelude for common imports.
pub mod prelude {
    pub use super::{CastError, Class, DataType, Property, Schema, SchemaCacheRef, SchemaError};
}
