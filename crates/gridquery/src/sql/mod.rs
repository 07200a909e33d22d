//! Parameter-bound SQL lowering of compiled queries.
//!
//! The predicate tree and order plan lower to one `SELECT` over the
//! sparse row table (`"cells"` is a JSON document keyed by column id).
//! Literals only ever travel through the parameter list; the rendered
//! text contains placeholders and nothing caller-controlled, which is
//! what makes injection impossible by construction rather than by
//! escaping discipline.

use crate::{
    cursor::{CursorAnchor, CursorBoundary},
    query::{CompiledQuery, NumberCompareOp, OrderPlan, Predicate, SortValue},
    schema::ColumnType,
    types::{ColumnId, TableId},
};

///
/// SqlParam
///

#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Text(String),
    Number(f64),
    Int(i64),
}

///
/// SqlSelect
///
/// One renderable statement: text with `$n` placeholders plus the
/// positional parameters, in order.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqlSelect {
    pub text: String,
    pub params: Vec<SqlParam>,
}

/// Render the page query: predicate, cursor continuation, ordering, and
/// a `LIMIT` already including the caller's sentinel row.
#[must_use]
pub fn render_list(
    table_id: TableId,
    query: &CompiledQuery,
    boundary: Option<&CursorBoundary>,
    fetch_limit: u32,
) -> SqlSelect {
    let mut builder = SqlBuilder::default();

    let table = builder.bind(SqlParam::Text(table_id.to_string()));
    let predicate = render_predicate(&mut builder, &query.predicate);
    let continuation = boundary.map(|b| render_continuation(&mut builder, &query.order, b));
    let order_by = render_order_by(&mut builder, &query.order);
    let limit = builder.bind(SqlParam::Int(i64::from(fetch_limit)));

    let mut text = format!(
        "SELECT \"id\", \"order\", \"cells\", \"createdAt\", \"updatedAt\" \
         FROM \"Row\" WHERE \"tableId\" = {table} AND {predicate}"
    );
    if let Some(continuation) = continuation {
        text.push_str(&format!(" AND {continuation}"));
    }
    text.push_str(&format!(" ORDER BY {order_by} LIMIT {limit}"));

    SqlSelect {
        text,
        params: builder.params,
    }
}

/// Render the sibling count query. Shares the exact predicate rendering
/// with [`render_list`]; no ordering, no window.
#[must_use]
pub fn render_count(table_id: TableId, query: &CompiledQuery) -> SqlSelect {
    let mut builder = SqlBuilder::default();

    let table = builder.bind(SqlParam::Text(table_id.to_string()));
    let predicate = render_predicate(&mut builder, &query.predicate);

    SqlSelect {
        text: format!(
            "SELECT count(*) FROM \"Row\" WHERE \"tableId\" = {table} AND {predicate}"
        ),
        params: builder.params,
    }
}

///
/// SqlBuilder
///

#[derive(Default)]
struct SqlBuilder {
    params: Vec<SqlParam>,
}

impl SqlBuilder {
    /// Bind one parameter and return its placeholder.
    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    /// The raw JSON text of one cell; SQL NULL when absent.
    fn cell(&mut self, column: ColumnId) -> String {
        let key = self.bind(SqlParam::Text(column.to_string()));
        format!("\"cells\"->>{key}")
    }

    /// Sort/compare key expression: empty string folds into NULL, and
    /// NUMBER columns cast to numeric.
    fn sort_key(&mut self, column: ColumnId, ty: ColumnType) -> String {
        let cell = self.cell(column);
        match ty {
            ColumnType::Number => format!("NULLIF({cell}, '')::numeric"),
            ColumnType::Text => format!("NULLIF({cell}, '')"),
        }
    }
}

fn render_predicate(builder: &mut SqlBuilder, predicate: &Predicate) -> String {
    match predicate {
        Predicate::True => "TRUE".to_string(),
        Predicate::And(children) => render_junction(builder, children, " AND "),
        Predicate::Or(children) => render_junction(builder, children, " OR "),
        Predicate::TextContains {
            column,
            needle,
            negated,
        } => {
            let cell = builder.cell(*column);
            let pattern = builder.bind(SqlParam::Text(like_pattern(needle)));
            let clause = format!("coalesce({cell}, '') ILIKE {pattern} ESCAPE '\\'");
            if *negated {
                format!("NOT ({clause})")
            } else {
                clause
            }
        }
        Predicate::TextEquals { column, expected } => {
            let cell = builder.cell(*column);
            let literal = builder.bind(SqlParam::Text(expected.clone()));
            // No coalesce: a NULL cell never equals anything, the empty
            // string included.
            format!("{cell} = {literal}")
        }
        Predicate::NumberCompare {
            column,
            op,
            literal,
        } => {
            let Some(literal) = literal else {
                // Unparseable condition value: matches nothing.
                return "FALSE".to_string();
            };
            let key = builder.sort_key(*column, ColumnType::Number);
            let value = builder.bind(SqlParam::Number(*literal));
            let op = match op {
                NumberCompareOp::Gt => ">",
                NumberCompareOp::Lt => "<",
                NumberCompareOp::Eq => "=",
            };
            format!("{key} {op} {value}")
        }
        Predicate::CellEmpty { column, negated } => {
            let cell = builder.cell(*column);
            let clause = format!("({cell} IS NULL OR {cell} = '')");
            if *negated {
                format!("NOT {clause}")
            } else {
                clause
            }
        }
    }
}

fn render_junction(builder: &mut SqlBuilder, children: &[Predicate], joiner: &str) -> String {
    if children.is_empty() {
        return "TRUE".to_string();
    }

    let parts: Vec<String> = children
        .iter()
        .map(|child| render_predicate(builder, child))
        .collect();

    format!("({})", parts.join(joiner))
}

fn render_order_by(builder: &mut SqlBuilder, order: &OrderPlan) -> String {
    let Some(key) = order.key else {
        return "\"order\" ASC, \"id\" ASC".to_string();
    };

    let expr = builder.sort_key(key.column, key.ty);
    let dir = if key.direction.is_desc() { "DESC" } else { "ASC" };

    // NULLS LAST regardless of direction; id ties break in the sort
    // direction.
    format!("{expr} {dir} NULLS LAST, \"id\" {dir}")
}

fn render_continuation(
    builder: &mut SqlBuilder,
    order: &OrderPlan,
    boundary: &CursorBoundary,
) -> String {
    match (&boundary.anchor, order.key) {
        (CursorAnchor::Order(anchor), _) => {
            let order_param = builder.bind(SqlParam::Int(*anchor));
            let id_param = builder.bind(SqlParam::Text(boundary.row_id.to_string()));
            format!("(\"order\", \"id\") > ({order_param}, {id_param})")
        }
        (CursorAnchor::SortValue(anchor), Some(key)) => {
            let op = if key.direction.is_desc() { "<" } else { ">" };
            let expr = builder.sort_key(key.column, key.ty);

            match order.key_of_cell(anchor) {
                // Boundary inside the trailing NULL block: continue by
                // id within it.
                None => {
                    let id_param = builder.bind(SqlParam::Text(boundary.row_id.to_string()));
                    format!("({expr} IS NULL AND \"id\" {op} {id_param})")
                }
                Some(value) => {
                    let value_param = builder.bind(match value {
                        SortValue::Number(n) => SqlParam::Number(n),
                        SortValue::Text(text) => SqlParam::Text(text),
                    });
                    let id_param = builder.bind(SqlParam::Text(boundary.row_id.to_string()));
                    // The OR-null clause keeps the whole NULL block
                    // reachable after the cursor leaves non-null
                    // territory.
                    format!(
                        "(({expr}, \"id\") {op} ({value_param}, {id_param}) OR {expr} IS NULL)"
                    )
                }
            }
        }
        // A sort-shaped boundary cannot continue a default-order walk;
        // the signature check rejects this before rendering.
        (CursorAnchor::SortValue(_), None) => "FALSE".to_string(),
    }
}

/// Wrap a needle for unanchored `ILIKE`, escaping its wildcard
/// metacharacters so caller text matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{OrderKey, SortDirection},
        types::RowId,
    };

    fn table() -> TableId {
        TableId::from_u128(1)
    }

    fn column() -> ColumnId {
        ColumnId::from_u128(7)
    }

    #[test]
    fn identity_list_renders_default_order_and_limit() {
        let query = CompiledQuery {
            predicate: Predicate::True,
            order: OrderPlan::default_order(),
        };
        let select = render_list(table(), &query, None, 101);

        assert_eq!(
            select.text,
            "SELECT \"id\", \"order\", \"cells\", \"createdAt\", \"updatedAt\" \
             FROM \"Row\" WHERE \"tableId\" = $1 AND TRUE \
             ORDER BY \"order\" ASC, \"id\" ASC LIMIT $2"
        );
        assert_eq!(
            select.params,
            vec![SqlParam::Text(table().to_string()), SqlParam::Int(101)]
        );
    }

    #[test]
    fn contains_renders_ilike_with_escaped_pattern() {
        let query = CompiledQuery {
            predicate: Predicate::TextContains {
                column: column(),
                needle: "50%_off\\now".into(),
                negated: false,
            },
            order: OrderPlan::default_order(),
        };
        let select = render_count(table(), &query);

        assert_eq!(
            select.text,
            "SELECT count(*) FROM \"Row\" WHERE \"tableId\" = $1 \
             AND coalesce(\"cells\"->>$2, '') ILIKE $3 ESCAPE '\\'"
        );
        assert_eq!(
            select.params[2],
            SqlParam::Text("%50\\%\\_off\\\\now%".into())
        );
    }

    #[test]
    fn not_contains_wraps_the_null_safe_clause() {
        let query = CompiledQuery {
            predicate: Predicate::TextContains {
                column: column(),
                needle: "x".into(),
                negated: true,
            },
            order: OrderPlan::default_order(),
        };
        let select = render_count(table(), &query);
        assert!(
            select
                .text
                .contains("NOT (coalesce(\"cells\"->>$2, '') ILIKE $3 ESCAPE '\\')"),
            "unexpected SQL: {}",
            select.text
        );
    }

    #[test]
    fn number_compare_casts_through_nullif() {
        let query = CompiledQuery {
            predicate: Predicate::NumberCompare {
                column: column(),
                op: NumberCompareOp::Gt,
                literal: Some(12.5),
            },
            order: OrderPlan::default_order(),
        };
        let select = render_count(table(), &query);
        assert!(
            select
                .text
                .contains("NULLIF(\"cells\"->>$2, '')::numeric > $3"),
            "unexpected SQL: {}",
            select.text
        );
        assert_eq!(select.params[2], SqlParam::Number(12.5));
    }

    #[test]
    fn unparseable_numeric_literal_renders_false() {
        let query = CompiledQuery {
            predicate: Predicate::NumberCompare {
                column: column(),
                op: NumberCompareOp::Lt,
                literal: None,
            },
            order: OrderPlan::default_order(),
        };
        let select = render_count(table(), &query);
        assert!(select.text.ends_with("AND FALSE"), "{}", select.text);
        assert_eq!(select.params.len(), 1);
    }

    #[test]
    fn junctions_parenthesize_for_safe_composition() {
        let leaf = |negated| Predicate::CellEmpty {
            column: column(),
            negated,
        };
        let query = CompiledQuery {
            predicate: Predicate::And(vec![
                Predicate::Or(vec![leaf(false), leaf(true)]),
                leaf(false),
            ]),
            order: OrderPlan::default_order(),
        };
        let select = render_count(table(), &query);
        assert!(
            select.text.contains("(((\"cells\"->>$2 IS NULL OR \"cells\"->>$2 = '') OR NOT (\"cells\"->>$3 IS NULL OR \"cells\"->>$3 = '')) AND (\"cells\"->>$4 IS NULL OR \"cells\"->>$4 = ''))"),
            "unexpected SQL: {}",
            select.text
        );
    }

    #[test]
    fn sorted_order_by_is_nulls_last_in_both_directions() {
        for (direction, rendered) in [
            (SortDirection::Asc, "ASC NULLS LAST, \"id\" ASC"),
            (SortDirection::Desc, "DESC NULLS LAST, \"id\" DESC"),
        ] {
            let query = CompiledQuery {
                predicate: Predicate::True,
                order: OrderPlan::sorted(OrderKey {
                    column: column(),
                    ty: ColumnType::Text,
                    direction,
                }),
            };
            let select = render_list(table(), &query, None, 11);
            assert!(select.text.contains(rendered), "{}", select.text);
            assert!(
                select.text.contains("ORDER BY NULLIF(\"cells\"->>$2, '')"),
                "{}",
                select.text
            );
        }
    }

    #[test]
    fn default_order_continuation_is_a_tuple_comparison() {
        let query = CompiledQuery {
            predicate: Predicate::True,
            order: OrderPlan::default_order(),
        };
        let boundary = CursorBoundary {
            row_id: RowId::from_u128(42),
            anchor: CursorAnchor::Order(17),
        };
        let select = render_list(table(), &query, Some(&boundary), 11);

        assert!(
            select.text.contains("AND (\"order\", \"id\") > ($2, $3)"),
            "{}",
            select.text
        );
        assert_eq!(select.params[1], SqlParam::Int(17));
        assert_eq!(
            select.params[2],
            SqlParam::Text(RowId::from_u128(42).to_string())
        );
    }

    #[test]
    fn valued_sort_continuation_keeps_the_null_block_reachable() {
        let query = CompiledQuery {
            predicate: Predicate::True,
            order: OrderPlan::sorted(OrderKey {
                column: column(),
                ty: ColumnType::Number,
                direction: SortDirection::Desc,
            }),
        };
        let boundary = CursorBoundary {
            row_id: RowId::from_u128(42),
            anchor: CursorAnchor::SortValue(crate::value::CellValue::Number(7.0)),
        };
        let select = render_list(table(), &query, Some(&boundary), 11);

        assert!(
            select.text.contains(
                "((NULLIF(\"cells\"->>$2, '')::numeric, \"id\") < ($3, $4) \
                 OR NULLIF(\"cells\"->>$2, '')::numeric IS NULL)"
            ),
            "{}",
            select.text
        );
        assert_eq!(select.params[2], SqlParam::Number(7.0));
        assert_eq!(
            select.params[3],
            SqlParam::Text(RowId::from_u128(42).to_string())
        );
    }

    #[test]
    fn null_sort_continuation_walks_the_null_block_by_id() {
        let query = CompiledQuery {
            predicate: Predicate::True,
            order: OrderPlan::sorted(OrderKey {
                column: column(),
                ty: ColumnType::Text,
                direction: SortDirection::Asc,
            }),
        };
        let boundary = CursorBoundary {
            row_id: RowId::from_u128(42),
            anchor: CursorAnchor::SortValue(crate::value::CellValue::Null),
        };
        let select = render_list(table(), &query, Some(&boundary), 11);

        assert!(
            select
                .text
                .contains("(NULLIF(\"cells\"->>$2, '') IS NULL AND \"id\" > $3)"),
            "{}",
            select.text
        );
    }
}
