use crate::{types::ColumnId, value::CellValue};
use serde::{Deserialize, Serialize};

///
/// Conjunction
///
/// Boolean combinator applied uniformly across a filter set's conditions.
/// The model is a flat list: no nested groups.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

///
/// FilterOperator
///
/// Full operator vocabulary across both column types. Which operators a
/// column type actually honors is decided at compile time; a condition
/// carrying an operator foreign to its column's type compiles to no
/// predicate at all.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Contains,
    NotContains,
    Equals,
    IsEmpty,
    IsNotEmpty,
    Gt,
    Lt,
}

///
/// FilterCondition
///
/// `value` is ignored for `isEmpty`/`isNotEmpty`. Values arrive as
/// string or number and are coerced best-effort against the column type
/// at compile time.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub column_id: ColumnId,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "is_null")]
    pub value: CellValue,
}

fn is_null(value: &CellValue) -> bool {
    matches!(value, CellValue::Null)
}

impl FilterCondition {
    #[must_use]
    pub fn new(column_id: ColumnId, operator: FilterOperator, value: CellValue) -> Self {
        Self {
            column_id,
            operator,
            value,
        }
    }
}

///
/// FilterSet
///
/// Condition order never affects semantics but is preserved for
/// round-tripping persisted configs.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSet {
    pub conjunction: Conjunction,
    pub conditions: Vec<FilterCondition>,
}

impl FilterSet {
    #[must_use]
    pub fn new(conjunction: Conjunction, conditions: Vec<FilterCondition>) -> Self {
        Self {
            conjunction,
            conditions,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

///
/// TESTS
///
