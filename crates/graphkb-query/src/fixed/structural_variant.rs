//! Structural-variant fallback compiler (§4.3.5), reached from a keyword search
//! whose sole word parses as an HGVS-like variant expression.

use crate::config::QueryLimits;
use crate::error::Result;
use crate::fixed::shared::disambiguate;
use graphkb_schema::Schema;
use graphkb_sql::{Param, ParamIndex, StatementFragment};
use graphkb_variant::{ParsedVariant, Position, PositionRange};

pub fn compile_structural_variant<'a>(
    _schema: &Schema,
    limits: &QueryLimits,
    target: &str,
    parsed: &ParsedVariant,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let mut idx = idx;
    let mut predicates = Vec::new();

    let (reference1, next) = loose_feature_match("reference1", &parsed.reference1, limits, idx);
    idx = next;
    predicates.push(reference1);

    let (variant_type, next) = loose_vocabulary_match(parsed.variant_type, idx);
    idx = next;
    predicates.push(variant_type);

    let reference2 = match &parsed.reference2 {
        Some(name) => {
            let (frag, next) = loose_feature_match("reference2", name, limits, idx);
            idx = next;
            frag
        }
        None => StatementFragment::raw("reference2 IS NULL"),
    };
    predicates.push(reference2);

    let (break1, next) = position_predicate("break1", &parsed.break1, idx);
    idx = next;
    predicates.push(break1);

    if let Some(break2) = &parsed.break2 {
        let (frag, next) = position_predicate("break2", break2, idx);
        idx = next;
        predicates.push(frag);
    } else {
        predicates.push(StatementFragment::raw("break2Start IS NULL"));
    }

    for (field, value) in [
        ("refSeq", parsed.ref_seq.as_ref()),
        ("untemplatedSeq", parsed.untemplated_seq.as_ref()),
    ] {
        let (frag, next) = sequence_predicate(field, value, idx);
        idx = next;
        predicates.push(frag);
    }
    let (size_frag, next) = size_predicate("untemplatedSeqSize", parsed.untemplated_seq_size, idx);
    idx = next;
    predicates.push(size_frag);

    let mut frag = StatementFragment::new();
    frag.push("SELECT * FROM ");
    frag.push(target);
    frag.push(" WHERE ");
    frag.append(StatementFragment::join(" AND ", predicates.into_iter().map(|p| p.parens())));

    Ok((frag, idx))
}

/// `reference1`/`reference2` are constrained by a loose, similarity-expanded
/// match against `Feature` by name or sourceId.
fn loose_feature_match<'a>(
    attribute: &str,
    name: &str,
    limits: &QueryLimits,
    idx: ParamIndex<'a>,
) -> (StatementFragment, ParamIndex<'a>) {
    let (param_name, idx) = idx.next_name();
    let base = StatementFragment::raw(format!(
        "(SELECT @rid FROM Feature WHERE name = :{param_name} OR sourceId = :{param_name})"
    ));
    let expanded = disambiguate(base, &limits.default_similarity_edges);

    let mut frag = StatementFragment::new();
    frag.push(attribute);
    frag.push(" IN ");
    frag.append(expanded);
    frag.bind_param(param_name, Param::Text(name.to_string()));
    (frag, idx)
}

fn loose_vocabulary_match(variant_type: graphkb_variant::VariantType, idx: ParamIndex<'_>) -> (StatementFragment, ParamIndex<'_>) {
    let (param_name, idx) = idx.next_name();
    let mut frag = StatementFragment::new();
    frag.push("type IN (SELECT @rid FROM Vocabulary WHERE name = ");
    frag.push_param(param_name, Param::Text(variant_type_name(variant_type).to_string()));
    frag.push(")");
    (frag, idx)
}

fn variant_type_name(variant_type: graphkb_variant::VariantType) -> &'static str {
    use graphkb_variant::VariantType;
    match variant_type {
        VariantType::Substitution => "substitution",
        VariantType::Deletion => "deletion",
        VariantType::Insertion => "insertion",
        VariantType::Duplication => "duplication",
        VariantType::DeletionInsertion => "indel",
    }
}

/// Interval overlap logic for a breakpoint: single-vs-single is equality,
/// single-vs-range and range-vs-range are bounded overlap checks.
fn position_predicate<'a>(field: &str, range: &PositionRange, idx: ParamIndex<'a>) -> (StatementFragment, ParamIndex<'a>) {
    let (start_param, idx) = idx.next_name();
    let mut frag = StatementFragment::new();

    match &range.end {
        None => {
            frag.push(&format!("{field}Start = "));
            frag.push_param(start_param, Param::Int(position_value(&range.start)));
            (frag, idx)
        }
        Some(end) => {
            let (end_param, idx) = idx.next_name();
            frag.push(&format!("{field}Start <= "));
            frag.push_param(end_param, Param::Int(position_value(end)));
            frag.push(&format!(" AND {field}End >= "));
            frag.push_param(start_param, Param::Int(position_value(&range.start)));
            (frag, idx)
        }
    }
}

fn position_value(pos: &Position) -> i64 {
    match pos {
        Position::Genomic(p) => *p,
        Position::Coding { pos, .. } => *pos,
        Position::Protein { pos, .. } => *pos,
        Position::Exonic(p) => *p,
        Position::Cytoband { major, .. } => *major,
        Position::NonCoding { pos, .. } => *pos,
    }
}

/// Accept an exact match, NULL, or a same-length placeholder of `x` repeats.
fn sequence_predicate<'a>(field: &str, value: Option<&String>, idx: ParamIndex<'a>) -> (StatementFragment, ParamIndex<'a>) {
    match value {
        None => (StatementFragment::raw(format!("{field} IS NULL")), idx),
        Some(seq) => {
            let (param_name, idx) = idx.next_name();
            let placeholder = "x".repeat(seq.len());
            let mut frag = StatementFragment::new();
            frag.push(&format!("({field} IS NULL OR {field} = "));
            frag.push_param(param_name, Param::Text(seq.clone()));
            frag.push(&format!(" OR {field} = "));
            frag.push(&quote(&placeholder));
            frag.push(")");
            (frag, idx)
        }
    }
}

fn size_predicate<'a>(field: &str, value: Option<i64>, idx: ParamIndex<'a>) -> (StatementFragment, ParamIndex<'a>) {
    match value {
        None => (StatementFragment::raw(format!("{field} IS NULL")), idx),
        Some(size) => {
            let (param_name, idx) = idx.next_name();
            let mut frag = StatementFragment::new();
            frag.push(&format!("({field} IS NULL OR {field} = "));
            frag.push_param(param_name, Param::Int(size));
            frag.push(")");
            (frag, idx)
        }
    }
}

fn quote(text: &str) -> String {
    format!("'{text}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphkb_schema::Schema;
    use graphkb_sql::ParamIndex;
    use graphkb_variant::{CoordinateType, VariantType};
    use pretty_assertions::assert_eq;

    fn variant() -> ParsedVariant {
        ParsedVariant {
            reference1: "KRAS".to_string(),
            reference2: None,
            coordinate_type: CoordinateType::Protein,
            variant_type: VariantType::Substitution,
            break1: PositionRange::single(Position::Protein { pos: 12, ref_aa: Some('G') }),
            break2: None,
            ref_seq: Some("G".to_string()),
            untemplated_seq: Some("D".to_string()),
            untemplated_seq_size: Some(1),
        }
    }

    #[test]
    fn single_breakpoint_substitution_binds_all_expected_parameters() {
        let schema = Schema::new();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let (frag, _idx) = compile_structural_variant(&schema, &limits, "PositionalVariant", &variant(), idx).unwrap();

        assert!(frag.statement().starts_with("SELECT * FROM PositionalVariant WHERE "));
        assert!(frag.statement().contains("reference1 IN"));
        assert!(frag.statement().contains("type IN (SELECT @rid FROM Vocabulary"));
        assert!(frag.statement().contains("reference2 IS NULL"));
        assert!(frag.statement().contains("break1Start ="));
        assert!(frag.statement().contains("break2Start IS NULL"));

        let params = frag.params();
        assert!(params.values().any(|p| *p == Param::Text("KRAS".to_string())));
        assert!(params.values().any(|p| *p == Param::Text("substitution".to_string())));
        assert!(params.values().any(|p| *p == Param::Int(12)));
        assert!(params.values().any(|p| *p == Param::Text("G".to_string())));
        assert!(params.values().any(|p| *p == Param::Text("D".to_string())));
        assert!(params.values().any(|p| *p == Param::Int(1)));
    }

    #[test]
    fn ranged_breakpoint_emits_overlap_bounds() {
        let schema = Schema::new();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let mut v = variant();
        v.break1 = PositionRange {
            start: Position::Genomic(100),
            end: Some(Position::Genomic(200)),
        };
        let (frag, _idx) = compile_structural_variant(&schema, &limits, "PositionalVariant", &v, idx).unwrap();
        assert!(frag.statement().contains("break1Start <="));
        assert!(frag.statement().contains("break1End >="));
    }

    // A two-reference variant (e.g. `BCR,ABL1:e.1_e.2`) must constrain reference1
    // and reference2 against their own features, not the same one twice.
    #[test]
    fn two_reference_variant_constrains_each_reference_independently() {
        let schema = Schema::new();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let mut v = variant();
        v.reference1 = "BCR".to_string();
        v.reference2 = Some("ABL1".to_string());

        let (frag, _idx) = compile_structural_variant(&schema, &limits, "PositionalVariant", &v, idx).unwrap();

        assert!(frag.statement().contains("reference1 IN"));
        assert!(frag.statement().contains("reference2 IN"));
        assert!(!frag.statement().contains("reference2 IS NULL"));
        let params = frag.params();
        assert!(params.values().any(|p| *p == Param::Text("BCR".to_string())));
        assert!(params.values().any(|p| *p == Param::Text("ABL1".to_string())));
    }

    #[test]
    fn variant_type_names_match_vocabulary_terms() {
        assert_eq!(variant_type_name(VariantType::Substitution), "substitution");
        assert_eq!(variant_type_name(VariantType::Deletion), "deletion");
        assert_eq!(variant_type_name(VariantType::Insertion), "insertion");
        assert_eq!(variant_type_name(VariantType::Duplication), "duplication");
        assert_eq!(variant_type_name(VariantType::DeletionInsertion), "indel");
    }
}
