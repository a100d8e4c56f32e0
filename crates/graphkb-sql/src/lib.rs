//! Statement text and parameter-map builder for the GraphKB structured query layer.
//!
//! Mirrors a conventional SQL-fragment builder, adapted for a graph-traversal
//! language with named, caller-allocated placeholders instead of positional ones
//! (see [`index::ParamIndex`]).

mod fragment;
mod index;
mod param;
mod record_id;

pub use fragment::StatementFragment;
pub use index::ParamIndex;
pub use param::Param;
pub use record_id::{RecordId, RecordIdParseError};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{Param, ParamIndex, RecordId, RecordIdParseError, StatementFragment};
}
