//! Comparison compilation (§4.4.1).

use crate::config::QueryLimits;
use crate::error::Result;
use crate::ir::{Comparison, ComparisonValue, Operator, Scalar};
use graphkb_schema::Schema;
use graphkb_sql::{Param, ParamIndex, StatementFragment};

pub fn compile_comparison<'a>(
    schema: &Schema,
    limits: &QueryLimits,
    model: &str,
    cmp: &Comparison,
    idx: ParamIndex<'a>,
) -> Result<(StatementFragment, ParamIndex<'a>)> {
    let is_this = cmp.property == "@this";

    let iterable = if is_this {
        false
    } else {
        schema
            .queryable_properties(model)?
            .get(&cmp.property)
            .map(|p| p.iterable)
            .unwrap_or(false)
    };

    let attr = if cmp.is_length {
        format!("{}.size()", cmp.property)
    } else {
        cmp.property.clone()
    };

    let (mut frag, idx) = match &cmp.value {
        ComparisonValue::Subquery(node) => {
            let (sub, idx) = crate::compiler::compile_query_node(schema, limits, node, idx)?;
            let mut frag = StatementFragment::new();
            frag.push(&attr);
            frag.push(" ");
            frag.push(cmp.operator.as_str());
            frag.push(" (");
            frag.append(sub);
            frag.push(")");
            (frag, idx)
        }
        ComparisonValue::List(scalars) => compile_list(&attr, cmp.operator, iterable, scalars, idx),
        ComparisonValue::Scalar(Scalar::Null) => {
            let mut frag = StatementFragment::new();
            frag.push(&attr);
            frag.push(" IS NULL");
            (frag, idx)
        }
        ComparisonValue::Scalar(scalar) if is_this => {
            let mut frag = StatementFragment::new();
            frag.push(cmp.operator.as_str());
            frag.push(" ");
            frag.push(&scalar_text(scalar));
            (frag, idx)
        }
        ComparisonValue::Scalar(scalar) => {
            let mut frag = StatementFragment::new();
            frag.push(&attr);
            frag.push(" ");
            frag.push(cmp.operator.as_str());
            frag.push(" ");
            let idx = push_scalar(&mut frag, idx, scalar);
            (frag, idx)
        }
    };

    if cmp.negate {
        frag = frag.map_statement(|s| format!("NOT ({s})"));
    }

    Ok((frag, idx))
}

fn compile_list<'a>(
    attr: &str,
    operator: Operator,
    iterable: bool,
    scalars: &[Scalar],
    mut idx: ParamIndex<'a>,
) -> (StatementFragment, ParamIndex<'a>) {
    let mut list_frag = StatementFragment::new();
    list_frag.push("[");
    for (i, scalar) in scalars.iter().enumerate() {
        if i > 0 {
            list_frag.push(", ");
        }
        idx = push_scalar(&mut list_frag, idx, scalar);
    }
    list_frag.push("]");

    let mut frag = StatementFragment::new();
    if iterable && operator == Operator::Eq {
        frag.push(attr);
        frag.push(" CONTAINSALL ");
        frag.append(list_frag);
        frag.push(" AND ");
        frag.push(attr);
        frag.push(".size() = ");
        let (size_name, next_idx) = idx.next_name();
        idx = next_idx;
        frag.push_param(size_name, Param::Int(scalars.len() as i64));
        frag = frag.parens();
    } else {
        frag.push(attr);
        frag.push(" ");
        frag.push(operator.as_str());
        frag.push(" ");
        frag.append(list_frag);
    }
    (frag, idx)
}

fn push_scalar<'a>(frag: &mut StatementFragment, idx: ParamIndex<'a>, scalar: &Scalar) -> ParamIndex<'a> {
    if let Scalar::RecordId(id) = scalar {
        frag.push_record_id(*id);
        return idx;
    }
    let (name, next_idx) = idx.next_name();
    frag.push_param(name, scalar_to_param(scalar));
    next_idx
}

fn scalar_to_param(scalar: &Scalar) -> Param {
    match scalar {
        Scalar::Null => Param::Null,
        Scalar::Bool(b) => Param::Bool(*b),
        Scalar::Int(i) => Param::Int(*i),
        Scalar::Float(f) => Param::Float(*f),
        Scalar::Text(s) => Param::Text(s.clone()),
        Scalar::RecordId(id) => Param::RecordId(*id),
    }
}

fn scalar_text(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Text(s) => s.clone(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphkb_schema::{Class, DataType, Property};
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        Schema::new().with_class(
            Class::new("Disease")
                .property(Property::new("name", DataType::Scalar))
                .property(Property::new("subsets", DataType::Scalar).iterable(true)),
        )
    }

    fn cmp(property: &str, operator: Operator, value: ComparisonValue) -> Comparison {
        Comparison { property: property.to_string(), operator, value, negate: false, is_length: false }
    }

    #[test]
    fn scalar_comparison_binds_a_parameter() {
        let schema = schema();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let c = cmp("name", Operator::Eq, ComparisonValue::Scalar(Scalar::Text("cancer".to_string())));
        let (frag, _idx) = compile_comparison(&schema, &limits, "Disease", &c, idx).unwrap();
        assert_eq!(frag.statement(), "name = :param0");
        assert_eq!(frag.params().get("param0"), Some(&Param::Text("cancer".to_string())));
    }

    #[test]
    fn null_scalar_uses_is_null() {
        let schema = schema();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let c = cmp("name", Operator::Eq, ComparisonValue::Scalar(Scalar::Null));
        let (frag, _idx) = compile_comparison(&schema, &limits, "Disease", &c, idx).unwrap();
        assert_eq!(frag.statement(), "name IS NULL");
        assert!(frag.params().is_empty());
    }

    #[test]
    fn negated_comparison_wraps_in_not() {
        let schema = schema();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let mut c = cmp("name", Operator::Eq, ComparisonValue::Scalar(Scalar::Text("cancer".to_string())));
        c.negate = true;
        let (frag, _idx) = compile_comparison(&schema, &limits, "Disease", &c, idx).unwrap();
        assert_eq!(frag.statement(), "NOT (name = :param0)");
    }

    #[test]
    fn iterable_property_set_equality_checks_size() {
        let schema = schema();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let c = cmp(
            "subsets",
            Operator::Eq,
            ComparisonValue::List(vec![Scalar::Text("a".to_string()), Scalar::Text("b".to_string())]),
        );
        let (frag, _idx) = compile_comparison(&schema, &limits, "Disease", &c, idx).unwrap();
        assert_eq!(
            frag.statement(),
            "(subsets CONTAINSALL [:param0, :param1] AND subsets.size() = :param2)"
        );
        assert_eq!(frag.params().get("param2"), Some(&Param::Int(2)));
    }

    #[test]
    fn record_id_in_list_is_rendered_literally() {
        let schema = schema();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let c = cmp(
            "@this",
            Operator::In,
            ComparisonValue::List(vec![Scalar::RecordId(graphkb_sql::RecordId::new(13, 1))]),
        );
        let (frag, _idx) = compile_comparison(&schema, &limits, "Disease", &c, idx).unwrap();
        assert_eq!(frag.statement(), "@this IN [#13:1]");
        assert!(frag.params().is_empty());
    }

    #[test]
    fn this_comparison_omits_the_attribute_name() {
        let schema = schema();
        let limits = QueryLimits::default();
        let idx = ParamIndex::new("", 0);
        let c = cmp("@this", Operator::InstanceOf, ComparisonValue::Scalar(Scalar::Text("Disease".to_string())));
        let (frag, _idx) = compile_comparison(&schema, &limits, "Disease", &c, idx).unwrap();
        assert_eq!(frag.statement(), "INSTANCEOF Disease");
    }
}
