//! Structural variant expression parsing.
//!
//! This is the "Variant parser" collaborator referenced in §6.3: the keyword-search
//! fixed-query compiler calls [`parse_variant`] as a fallback when a single-word
//! keyword search targets a `Variant`-descended class, to recognize HGVS-like
//! shorthand (`KRAS:p.G12D`) and compile a structurally precise subquery instead of
//! a plain text match (§4.3.5).

mod error;
mod parser;
mod types;

pub use error::ParsingError;
pub use parser::parse_variant;
pub use types::{CoordinateType, ParsedVariant, Position, PositionRange, VariantType};
