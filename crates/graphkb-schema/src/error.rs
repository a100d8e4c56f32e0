//! Schema adapter errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown class: {0:?}")]
    UnknownClass(String),

    #[error("queryable-property flattening exceeded its recursion cap while expanding {0:?}")]
    FlatteningTooDeep(String),
}
