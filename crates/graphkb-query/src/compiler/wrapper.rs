//! WrapperQuery compilation (§4.4.4): applies projection replacement,
//! `count(*) AS count`, `ORDER BY`, `SKIP`, and `LIMIT` around the already
//! compiled inner statement.

use crate::error::Result;
use crate::ir::{OrderDirection, WrapperQuery};
use crate::parser::projection_model;
use crate::projection::render_projection;
use graphkb_schema::Schema;
use graphkb_sql::StatementFragment;

pub fn compile_wrapper(schema: &Schema, wrapper: &WrapperQuery, inner: StatementFragment) -> Result<StatementFragment> {
    let model = projection_model(&wrapper.inner);

    if wrapper.count {
        let mut frag = StatementFragment::new();
        frag.push("SELECT count(*) AS count FROM (");
        frag.append(inner);
        frag.push(")");
        return Ok(frag);
    }

    let projected = render_projection(schema, model, &wrapper.projection, wrapper.history)?;

    let needs_wrapping = !matches!(wrapper.projection, crate::ir::Projection::Flat)
        || !wrapper.order_by.is_empty()
        || wrapper.skip.is_some()
        || wrapper.limit.is_some();

    if !needs_wrapping {
        return Ok(inner);
    }

    let mut frag = StatementFragment::new();
    frag.push("SELECT ");
    frag.push(&projected);
    frag.push(" FROM (");
    frag.append(inner);
    frag.push(")");

    if !wrapper.order_by.is_empty() {
        frag.push(" ORDER BY ");
        frag.push(&wrapper.order_by.join(", "));
        frag.push(" ");
        frag.push(order_direction_str(wrapper.order_by_direction));
    }

    if let Some(skip) = wrapper.skip {
        frag.push(&format!(" SKIP {skip}"));
    }

    if let Some(limit) = wrapper.limit {
        frag.push(&format!(" LIMIT {limit}"));
    }

    Ok(frag)
}

fn order_direction_str(direction: OrderDirection) -> &'static str {
    direction.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Projection, QueryNode, Subquery, Target};
    use graphkb_schema::{Class, DataType, Property};
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        Schema::new().with_class(
            Class::new("Disease")
                .property(Property::new("name", DataType::Scalar))
                .property(Property::new("deletedAt", DataType::Scalar)),
        )
    }

    fn wrapper(projection: Projection) -> WrapperQuery {
        WrapperQuery {
            inner: QueryNode::Subquery(Subquery {
                target: Target::Class("Disease".to_string()),
                history: false,
                filters: None,
                model: "Disease".to_string(),
            }),
            limit: None,
            skip: None,
            projection,
            order_by: Vec::new(),
            order_by_direction: OrderDirection::Asc,
            count: false,
            history: false,
        }
    }

    #[test]
    fn flat_projection_with_no_options_leaves_inner_untouched() {
        let schema = schema();
        let w = wrapper(Projection::Flat);
        let inner = StatementFragment::raw("SELECT * FROM Disease");
        let result = compile_wrapper(&schema, &w, inner).unwrap();
        assert_eq!(result.statement(), "SELECT * FROM Disease");
    }

    #[test]
    fn explicit_projection_wraps_in_an_outer_select() {
        let schema = schema();
        let w = wrapper(Projection::Explicit(vec!["name".to_string()]));
        let inner = StatementFragment::raw("SELECT * FROM Disease");
        let result = compile_wrapper(&schema, &w, inner).unwrap();
        assert_eq!(result.statement(), "SELECT name FROM (SELECT * FROM Disease)");
    }

    #[test]
    fn count_short_circuits_projection_and_paging() {
        let schema = schema();
        let mut w = wrapper(Projection::Flat);
        w.count = true;
        w.limit = Some(10);
        let inner = StatementFragment::raw("SELECT * FROM Disease");
        let result = compile_wrapper(&schema, &w, inner).unwrap();
        assert_eq!(result.statement(), "SELECT count(*) AS count FROM (SELECT * FROM Disease)");
    }

    #[test]
    fn order_skip_and_limit_are_appended_in_order() {
        let schema = schema();
        let mut w = wrapper(Projection::Flat);
        w.order_by = vec!["name".to_string()];
        w.order_by_direction = OrderDirection::Desc;
        w.skip = Some(5);
        w.limit = Some(20);
        let inner = StatementFragment::raw("SELECT * FROM Disease");
        let result = compile_wrapper(&schema, &w, inner).unwrap();
        assert_eq!(
            result.statement(),
            "SELECT * FROM (SELECT * FROM Disease) ORDER BY name DESC SKIP 5 LIMIT 20"
        );
    }
}
