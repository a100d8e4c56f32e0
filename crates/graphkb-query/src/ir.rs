//! Query intermediate representation (§3).
//!
//! IR nodes are constructed and validated during parsing, then consumed once by the
//! compiler. A `Subquery`'s target, or a `Comparison`'s value, may nest another
//! `Subquery`/`FixedSubquery` — the IR is a tagged-variant tree owned by its parent,
//! never shared (§9: "model IR as a tagged-variant tree, owned by its parent; do not
//! use shared ownership").

use graphkb_sql::RecordId;

/// The closed comparison-operator set (§3 invariant 6, minus AND/OR which are
/// `LogicOp`, not a `Comparison` operator — see §4.2.1 rule 5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Contains,
    ContainsAll,
    ContainsAny,
    ContainsText,
    Is,
    InstanceOf,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "IN",
            Self::Contains => "CONTAINS",
            Self::ContainsAll => "CONTAINSALL",
            Self::ContainsAny => "CONTAINSANY",
            Self::ContainsText => "CONTAINSTEXT",
            Self::Is => "IS",
            Self::InstanceOf => "INSTANCEOF",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "=" => Self::Eq,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "IN" => Self::In,
            "CONTAINS" => Self::Contains,
            "CONTAINSALL" => Self::ContainsAll,
            "CONTAINSANY" => Self::ContainsAny,
            "CONTAINSTEXT" => Self::ContainsText,
            "IS" => Self::Is,
            "INSTANCEOF" => Self::InstanceOf,
            _ => return None,
        })
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, Self::Lt | Self::Lte | Self::Gt | Self::Gte)
    }
}

/// The logical connective of a `Clause`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// A single, non-compound scalar.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    RecordId(RecordId),
}

/// The value side of a `Comparison`.
#[derive(Clone, Debug, PartialEq)]
pub enum ComparisonValue {
    Scalar(Scalar),
    /// An ordered list of scalars or record ids.
    List(Vec<Scalar>),
    /// A nested subquery (generic or fixed).
    Subquery(Box<QueryNode>),
}

/// (property name, property meta is looked up at compile time from the schema,
/// operator, value, negate flag, isLength flag) — §3.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub property: String,
    pub operator: Operator,
    pub value: ComparisonValue,
    pub negate: bool,
    pub is_length: bool,
}

/// A child of a `Clause`: either a nested clause or a leaf comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum ClauseChild {
    Clause(Clause),
    Comparison(Comparison),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub operator: LogicOp,
    pub children: Vec<ClauseChild>,
}

impl Clause {
    pub fn new(operator: LogicOp, children: Vec<ClauseChild>) -> Self {
        Self { operator, children }
    }

    /// A clause is only worth parenthesizing as a unit when it has more than one
    /// filter (§4.4.2).
    pub fn needs_parens(&self) -> bool {
        self.children.len() > 1
    }
}

/// The target of a `Subquery`: a class name, a non-empty literal id list, or a
/// nested query.
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    Class(String),
    Ids(Vec<RecordId>),
    Nested(Box<QueryNode>),
}

/// (target, history flag, optional filters) — §3. `model` is the class name
/// filters were resolved against during parsing (the target class, or the `V`/`E`
/// default when the target isn't a plain class name); kept alongside rather than
/// re-derived at compile time, since a `Target::Ids`/`Target::Nested` carries no
/// class name of its own.
#[derive(Clone, Debug, PartialEq)]
pub struct Subquery {
    pub target: Target,
    pub history: bool,
    pub filters: Option<Clause>,
    pub model: String,
}

/// The six fixed traversal forms (§4.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryType {
    Ancestors,
    Descendants,
    Neighborhood,
    SimilarTo,
    Keyword,
    Edge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeDirection {
    In,
    Out,
    Both,
}

/// Type-specific payload for each `FixedSubquery` query type.
#[derive(Clone, Debug, PartialEq)]
pub enum FixedPayload {
    /// ancestors / descendants (§4.3.1). `edges` disambiguates the starting set
    /// across similarity edges before the walk; `tree_edges` is what the
    /// `TRAVERSE` itself follows (the source calls both of these `edges` in
    /// different places — §9 "ambiguity in keyword fallback" applies here too).
    TreeWalk {
        filters: Option<Clause>,
        target: Target,
        edges: Vec<String>,
        tree_edges: Vec<String>,
        depth: i64,
        disambiguate: bool,
        model: String,
    },
    /// neighborhood (§4.3.2).
    Neighborhood {
        filters: Option<Clause>,
        target: String,
        edges: Vec<String>,
        depth: i64,
    },
    /// similarTo (§4.3.3).
    SimilarTo {
        target: Target,
        edges: Vec<String>,
        tree_edges: Vec<String>,
        match_type: Option<String>,
    },
    /// keyword (§4.3.4 / §4.3.5).
    Keyword {
        target: String,
        keyword: String,
        operator: Operator,
    },
    /// edge (§4.3.6).
    Edge {
        target: String,
        direction: EdgeDirection,
        vertex_filter: Target,
    },
}

/// (queryType, option bag specific to that type) — §3. `history` applies uniformly.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedSubquery {
    pub query_type: QueryType,
    pub history: bool,
    pub payload: FixedPayload,
}

/// Either shape a nested query position (subquery target, comparison value) can take.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryNode {
    Subquery(Subquery),
    Fixed(FixedSubquery),
}

impl QueryNode {
    pub fn history(&self) -> bool {
        match self {
            Self::Subquery(s) => s.history,
            Self::Fixed(f) => f.history,
        }
    }
}

/// What the compiled statement should project (§4.5).
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// `*`.
    Flat,
    /// Explicit dotted property paths.
    Explicit(Vec<String>),
    /// Recursive neighbor expansion to the given depth (1..=4).
    Recursive(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// The outer shell wrapping every top-level parse (§3, §4.2.4).
#[derive(Clone, Debug, PartialEq)]
pub struct WrapperQuery {
    pub inner: QueryNode,
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub projection: Projection,
    pub order_by: Vec<String>,
    pub order_by_direction: OrderDirection,
    pub count: bool,
    pub history: bool,
}
