//! Parsed structural-variant expression types.

/// The coordinate system a position is expressed in, taken from the HGVS-style
/// prefix immediately after the reference name (`g.`, `c.`, `p.`, `e.`, `y.`, `n.`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateType {
    Genomic,
    Coding,
    Protein,
    Exonic,
    Cytoband,
    NonCoding,
}

/// A single breakpoint position, shaped by its coordinate system.
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    Genomic(i64),
    /// Coding-sequence position with an optional intronic offset (`123+4`, `123-4`).
    Coding { pos: i64, offset: i64 },
    /// Protein position with an optional reference amino acid (`G12`).
    Protein { pos: i64, ref_aa: Option<char> },
    Exonic(i64),
    Cytoband { arm: char, major: i64, minor: Option<i64> },
    NonCoding { pos: i64, offset: i64 },
}

/// A breakpoint, either a single position or a range (`123_456`).
#[derive(Clone, Debug, PartialEq)]
pub struct PositionRange {
    pub start: Position,
    pub end: Option<Position>,
}

impl PositionRange {
    pub fn single(pos: Position) -> Self {
        Self { start: pos, end: None }
    }

    pub fn is_range(&self) -> bool {
        self.end.is_some()
    }
}

/// The kind of structural change described.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantType {
    Substitution,
    Deletion,
    Insertion,
    Duplication,
    DeletionInsertion,
}

/// A fully parsed structural variant expression (§4.3.5).
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedVariant {
    pub reference1: String,
    pub reference2: Option<String>,
    pub coordinate_type: CoordinateType,
    pub variant_type: VariantType,
    pub break1: PositionRange,
    pub break2: Option<PositionRange>,
    pub ref_seq: Option<String>,
    pub untemplated_seq: Option<String>,
    pub untemplated_seq_size: Option<i64>,
}
