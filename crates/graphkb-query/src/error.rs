//! Error taxonomy (§7).
//!
//! Exactly one error kind is surfaced to callers: [`Error::Validation`]. Its payload,
//! [`ValidationError`], is a closed, exhaustively-matched enum naming the specific
//! rule that failed along with the offending property/operator/value, so `Display`
//! produces the precise string §7 requires and tests can assert on the variant
//! rather than scraping a message. [`Error::Internal`] exists only for states the
//! parser/compiler should never reach on well-formed IR (a schema invariant broken
//! by a programming error, not by user input) — it is never raised by any of the
//! documented parse/compile paths.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An invariant the parser/compiler relies on was violated by something other
    /// than user input (e.g. the schema adapter returned an inconsistent view).
    /// Distinct from `Validation` so tests can assert on category (§9).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<graphkb_schema::SchemaError> for Error {
    fn from(e: graphkb_schema::SchemaError) -> Self {
        match e {
            graphkb_schema::SchemaError::UnknownClass(name) => {
                Error::Validation(ValidationError::UnknownClass(name))
            }
            other => Error::Internal(other.to_string()),
        }
    }
}

/// One variant per rule in §3/§4/§6 whose violation is user-facing.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("unknown class: {0:?}")]
    UnknownClass(String),

    #[error("class {class:?} is abstract and cannot be queried directly")]
    AbstractClassTarget { class: String },

    #[error("unknown property {property:?} on class {class:?}")]
    UnknownProperty { class: String, property: String },

    #[error("operator {operator:?} is not permitted here: {reason}")]
    OperatorNotAllowed { operator: String, reason: String },

    #[error("AND/OR cannot be used as a comparison operator")]
    LogicOperatorAsComparison,

    #[error("@this may only be compared with INSTANCEOF")]
    ThisRequiresInstanceOf,

    #[error("value {value} is not among the allowed choices for property {property:?}")]
    ChoiceNotAllowed { property: String, value: String },

    #[error("failed to cast value for property {property:?}: {reason}")]
    CastFailed { property: String, reason: String },

    #[error("clause must have exactly one of AND/OR with a non-empty list")]
    MalformedClause,

    #[error("comparison spec must name exactly one property")]
    MalformedComparison,

    #[error("limit {0} out of range [1, 1000]")]
    LimitOutOfRange(i64),

    #[error("skip {0} must be >= 0")]
    SkipOutOfRange(i64),

    #[error("neighbors {0} out of range [0, 4]")]
    NeighborsOutOfRange(i64),

    #[error("depth {0} out of range [{1}, {2}]")]
    DepthOutOfRange(i64, i64, i64),

    #[error("keyword search requires a non-empty keyword")]
    EmptyKeyword,

    #[error("target list must be non-empty")]
    EmptyTargetList,

    #[error("subquery spec is missing a target")]
    MissingTarget,

    #[error("malformed record id: {0:?}")]
    MalformedRecordId(String),

    #[error("unrecognized field {0:?} alongside no queryType")]
    UnrecognizedField(String),

    #[error("unknown edge class: {0:?}")]
    UnknownEdgeClass(String),

    #[error("similarTo requires at least one similarity edge")]
    NoSimilarityEdges,

    #[error("edge query requires a vertexFilter")]
    MissingVertexFilter,

    #[error("count cannot be combined with orderBy/skip/limit driving row selection")]
    CountConflictsWithPagination,

    #[error("orderByDirection must be exactly ASC or DESC")]
    InvalidOrderDirection,

    #[error("recursion depth limit ({0}) exceeded while parsing a nested subquery")]
    RecursionLimitExceeded(usize),

    #[error("could not coerce option {option:?} from {value:?}")]
    InvalidOptionValue { option: String, value: String },
}
