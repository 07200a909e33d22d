use crate::{
    query::{
        Conjunction, FilterCondition, FilterOperator, FilterSet, NumberCompareOp, OrderKey,
        OrderPlan, Predicate, QuerySpec,
    },
    schema::{ColumnType, TableSchema},
};
use serde::Serialize;

///
/// CompiledQuery
///
/// Executable form of one normalized spec: a boolean predicate tree and
/// an ordering plan. `list` consumes both; `count` consumes the predicate
/// through the identical compilation path, which is what keeps the two
/// operations agreeing on row membership.
///
/// Serializes for continuation-signature hashing only.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub predicate: Predicate,
    pub order: OrderPlan,
}

/// Compile a normalized spec against the live schema.
#[must_use]
pub fn compile(spec: &QuerySpec, schema: &TableSchema) -> CompiledQuery {
    let predicate = Predicate::all(vec![
        compile_search(spec.search.as_deref(), schema),
        compile_filters(&spec.filters, schema),
    ]);

    CompiledQuery {
        predicate,
        order: compile_order(spec, schema),
    }
}

/// Search spans every column as a case-insensitive substring match, OR'd
/// together. Blank search or a column-less table is the identity.
fn compile_search(search: Option<&str>, schema: &TableSchema) -> Predicate {
    let Some(needle) = search.map(str::trim).filter(|needle| !needle.is_empty()) else {
        return Predicate::True;
    };
    if schema.is_empty() {
        return Predicate::True;
    }

    Predicate::Or(
        schema
            .columns()
            .iter()
            .map(|column| Predicate::TextContains {
                column: column.id,
                needle: needle.to_string(),
                negated: false,
            })
            .collect(),
    )
}

fn compile_filters(filters: &FilterSet, schema: &TableSchema) -> Predicate {
    let parts: Vec<Predicate> = filters
        .conditions
        .iter()
        .filter_map(|condition| compile_condition(condition, schema))
        .collect();

    if parts.is_empty() {
        return Predicate::True;
    }
    if parts.len() == 1 {
        let mut parts = parts;
        return parts.remove(0);
    }

    match filters.conjunction {
        Conjunction::And => Predicate::And(parts),
        Conjunction::Or => Predicate::Or(parts),
    }
}

/// One condition against one typed column. Operators foreign to the
/// column's type contribute nothing, by design a no-op rather than an
/// error, so a stale saved filter can never fail the whole request.
fn compile_condition(condition: &FilterCondition, schema: &TableSchema) -> Option<Predicate> {
    let ty = schema.column_type(condition.column_id)?;
    let column = condition.column_id;

    let predicate = match (ty, condition.operator) {
        (_, FilterOperator::IsEmpty) => Predicate::CellEmpty {
            column,
            negated: false,
        },
        (_, FilterOperator::IsNotEmpty) => Predicate::CellEmpty {
            column,
            negated: true,
        },
        (ColumnType::Text, FilterOperator::Contains) => Predicate::TextContains {
            column,
            needle: condition.value.text_form(),
            negated: false,
        },
        (ColumnType::Text, FilterOperator::NotContains) => Predicate::TextContains {
            column,
            needle: condition.value.text_form(),
            negated: true,
        },
        (ColumnType::Text, FilterOperator::Equals) => Predicate::TextEquals {
            column,
            expected: condition.value.text_form(),
        },
        (ColumnType::Number, FilterOperator::Gt) => number_compare(condition, NumberCompareOp::Gt),
        (ColumnType::Number, FilterOperator::Lt) => number_compare(condition, NumberCompareOp::Lt),
        (ColumnType::Number, FilterOperator::Equals) => {
            number_compare(condition, NumberCompareOp::Eq)
        }
        // Ordering operators on TEXT and substring operators on NUMBER
        // are not part of the vocabulary.
        (ColumnType::Text, FilterOperator::Gt | FilterOperator::Lt)
        | (
            ColumnType::Number,
            FilterOperator::Contains | FilterOperator::NotContains,
        ) => return None,
    };

    Some(predicate)
}

fn number_compare(condition: &FilterCondition, op: NumberCompareOp) -> Predicate {
    Predicate::NumberCompare {
        column: condition.column_id,
        op,
        // Best-effort parse; an unparseable literal matches nothing.
        literal: condition.value.as_numeric(),
    }
}

fn compile_order(spec: &QuerySpec, schema: &TableSchema) -> OrderPlan {
    let Some(key) = spec.sorts.primary() else {
        return OrderPlan::default_order();
    };
    let Some(ty) = schema.column_type(key.column_id) else {
        return OrderPlan::default_order();
    };

    OrderPlan::sorted(OrderKey {
        column: key.column_id,
        ty,
        direction: key.direction,
    })
}

///
/// TESTS
///
