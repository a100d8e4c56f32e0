//! keyword search (§4.3.4), including the record-id and structural-variant
//! short-circuits and the §4.3.5 structural-variant fallback.

use crate::compiler::subquery::wrap_soft_delete;
use crate::config::QueryLimits;
use crate::error::Result;
use crate::fixed::structural_variant;
use crate::ir::Operator;
use graphkb_schema::Schema;
use graphkb_sql::{Param, ParamIndex, RecordId, StatementFragment};
use std::str::FromStr;

pub fn compile_keyword<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    history: bool,
    target: &str,
    keyword: &str,
    operator: Operator,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let words = normalize(keyword, operator);

    let result = if words.len() == 1 {
        let (frag, idx) = compile_single_word_short_circuits(schema, limits, target, &words[0], operator, idx)?;
        match frag {
            Some((frag, idx)) => return finish(history, frag, idx),
            None => fold_words(schema, target, &words, idx)?,
        }
    } else {
        fold_words(schema, target, &words, idx)?
    };

    let (frag, idx) = result;
    finish(history, frag, idx)
}

fn finish<'a>(history: bool, frag: StatementFragment, idx: ParamIndex<'a>) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let frag = if history { frag } else { wrap_soft_delete(frag) };
    Ok((frag, idx))
}

/// Record-ID and structural-variant short-circuits, tried before multi-word
/// composition (§4.3.4). Returns `Some` when a short-circuit fired.
fn compile_single_word_short_circuits<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    target: &str,
    word: &str,
    operator: Operator,
    idx: ParamIndex<'a>,
) -> Result<(Option<(StatementFragment, ParamIndex<'a>)>, ParamIndex<'a>)> {
    if let Ok(id) = RecordId::from_str(word) {
        let mut frag = StatementFragment::new();
        frag.push("SELECT * FROM ");
        frag.push(target);
        frag.push(" WHERE @rid = ");
        frag.push_record_id(id);
        return Ok((Some((frag, idx)), idx));
    }

    if schema.inherits_from(target, "Variant") || target == "Variant" {
        match graphkb_variant::parse_variant(word) {
            Ok(parsed) => {
                let (frag, idx) = structural_variant::compile_structural_variant(schema, limits, target, &parsed, idx)?;
                return Ok((Some((frag, idx)), idx));
            }
            Err(err) => {
                tracing::debug!(word, error = %err, "keyword word did not parse as a structural variant, falling back to plain keyword match");
            }
        }
    }

    Ok((None, idx))
}

fn fold_words<'a>(
    schema: &Schema,
    target: &str,
    words: &[String],
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let mut idx = idx;
    let mut statement: Option<StatementFragment> = None;

    for word in words {
        let round_operator = if word.chars().count() < 3 { Operator::Eq } else { Operator::ContainsText };
        let (param_name, next_idx) = idx.next_name();
        idx = next_idx;

        let mut round = StatementFragment::new();
        round.push("SELECT * FROM ");
        match statement.take() {
            Some(prev) => {
                round.push("(");
                round.append(prev);
                round.push(")");
            }
            None => round.push(target),
        }
        round.push(" WHERE (");
        round.append(build_predicate(schema, target, &param_name, round_operator));
        round.push(")");
        round.bind_param(param_name, Param::Text(word.clone()));

        statement = Some(round);
    }

    Ok((statement.expect("word list is non-empty"), idx))
}

fn build_predicate(schema: &Schema, target: &str, param_name: &str, operator: Operator) -> StatementFragment {
    let op = operator.as_str();
    let placeholder = format!(":{param_name}");

    let mut frag = StatementFragment::new();

    if target == "Statement" {
        // Statement has no text field of its own: recursively keyword-search
        // Ontology and Variant, then filter statements whose conditions/
        // evidence/evidenceLevel/subject/relevance links intersect either set.
        let ontology_match = ontology_match_subquery(&placeholder, op);
        let variant_match = variant_match_subquery(&placeholder, op);

        frag.push("conditions CONTAINSANY (");
        frag.push(&ontology_match);
        frag.push(") OR conditions CONTAINSANY (");
        frag.push(&variant_match);
        frag.push(") OR evidence CONTAINSANY (");
        frag.push(&ontology_match);
        frag.push(") OR evidence CONTAINSANY (");
        frag.push(&variant_match);
        frag.push(") OR evidenceLevel CONTAINSANY (");
        frag.push(&ontology_match);
        frag.push(") OR subject IN (");
        frag.push(&ontology_match);
        frag.push(") OR subject IN (");
        frag.push(&variant_match);
        frag.push(") OR relevance IN (SELECT @rid FROM Vocabulary WHERE name ");
        frag.push(op);
        frag.push(" ");
        frag.push(&placeholder);
        frag.push(")");
        return frag;
    }

    if schema.inherits_from(target, "Variant") {
        frag.push(&variant_where_body(&placeholder, op));
        return frag;
    }

    let is_evidence_level = target == "EvidenceLevel";
    let is_ontology_like = target == "Evidence" || is_evidence_level || schema.inherits_from(target, "Ontology");

    if is_ontology_like {
        frag.push("name ");
        frag.push(op);
        frag.push(" ");
        frag.push(&placeholder);
        frag.push(" OR sourceId ");
        frag.push(op);
        frag.push(" ");
        frag.push(&placeholder);
        if is_evidence_level {
            frag.push(" OR source.name ");
            frag.push(op);
            frag.push(" ");
            frag.push(&placeholder);
        }
        return frag;
    }

    frag.push("name ");
    frag.push(op);
    frag.push(" ");
    frag.push(&placeholder);
    frag
}

/// `WHERE` body matching `Ontology.name`/`sourceId` against the bound word.
fn ontology_where_body(placeholder: &str, op: &str) -> String {
    format!("name {op} {placeholder} OR sourceId {op} {placeholder}")
}

/// `WHERE` body matching a `Variant`-descended row's `type`/`reference1`/
/// `reference2` against the bound word, recursively through Vocabulary/Ontology.
fn variant_where_body(placeholder: &str, op: &str) -> String {
    let ontology_body = ontology_where_body(placeholder, op);
    format!(
        "type IN (SELECT @rid FROM Vocabulary WHERE name {op} {placeholder}) \
         OR reference1 IN (SELECT @rid FROM Ontology WHERE {ontology_body}) \
         OR reference2 IN (SELECT @rid FROM Ontology WHERE {ontology_body})"
    )
}

fn ontology_match_subquery(placeholder: &str, op: &str) -> String {
    format!("SELECT @rid FROM Ontology WHERE {}", ontology_where_body(placeholder, op))
}

fn variant_match_subquery(placeholder: &str, op: &str) -> String {
    format!("SELECT @rid FROM Variant WHERE {}", variant_where_body(placeholder, op))
}

/// Trim, lowercase, split (if `CONTAINSTEXT`), dedupe, sort, drop empties
/// (§4.3.4).
fn normalize(keyword: &str, operator: Operator) -> Vec<String> {
    let lowered = keyword.trim().to_lowercase();
    let mut words: Vec<String> = if operator == Operator::ContainsText {
        lowered.split_whitespace().map(str::to_string).collect()
    } else {
        vec![lowered]
    };
    words.retain(|w| !w.is_empty());
    words.sort();
    words.dedup();
    if words.is_empty() {
        words.push(String::new());
    }
    words
}
