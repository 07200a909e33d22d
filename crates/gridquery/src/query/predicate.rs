use crate::{store::Row, types::ColumnId, value::CellValue};
use serde::Serialize;

///
/// Predicate
///
/// Typed boolean expression tree produced by compilation. Injection
/// safety is structural: literals live in typed fields, never in query
/// text. The same tree drives the in-process evaluator here and the
/// parameter-bound SQL renderer.
///
/// Serializes (for continuation-signature hashing) but never
/// deserializes: trees are always rebuilt from the normalized spec.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Predicate {
    /// Identity predicate: matches every row.
    True,
    And(Vec<Self>),
    Or(Vec<Self>),
    /// Case-insensitive substring over the cell's NULL-safe text form.
    /// `negated` is `notContains`, under which `Null` cells match.
    TextContains {
        column: ColumnId,
        needle: String,
        negated: bool,
    },
    /// Exact string equality. `Null` does not equal the empty string
    /// here, unlike `CellEmpty` — a deliberate asymmetry, preserved.
    TextEquals { column: ColumnId, expected: String },
    /// Numeric comparison after `NULLIF(cell,'')::numeric` coercion.
    /// `literal: None` records an unparseable condition value; the
    /// comparison then matches nothing rather than erroring.
    NumberCompare {
        column: ColumnId,
        op: NumberCompareOp,
        literal: Option<f64>,
    },
    /// `cell IS NULL OR cell = ''`, negated for `isNotEmpty`.
    CellEmpty { column: ColumnId, negated: bool },
}

///
/// NumberCompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum NumberCompareOp {
    Gt,
    Lt,
    Eq,
}

impl Predicate {
    /// Evaluate against one row. Absent cells read as `Null`.
    #[must_use]
    pub fn eval(&self, row: &Row) -> bool {
        match self {
            Self::True => true,
            Self::And(children) => children.iter().all(|child| child.eval(row)),
            Self::Or(children) => children.iter().any(|child| child.eval(row)),
            Self::TextContains {
                column,
                needle,
                negated,
            } => row.cell(*column).contains_ci(needle) != *negated,
            Self::TextEquals { column, expected } => match row.cell(*column) {
                CellValue::Text(text) => text == expected,
                CellValue::Number(_) | CellValue::Null => false,
            },
            Self::NumberCompare {
                column,
                op,
                literal,
            } => {
                let (Some(literal), Some(cell)) = (literal, row.cell(*column).as_numeric()) else {
                    return false;
                };
                match op {
                    NumberCompareOp::Gt => cell > *literal,
                    NumberCompareOp::Lt => cell < *literal,
                    NumberCompareOp::Eq => (cell - *literal).abs() == 0.0,
                }
            }
            Self::CellEmpty { column, negated } => {
                row.cell(*column).is_empty_cell() != *negated
            }
        }
    }

    /// Conjunction of parts with identity predicates folded away.
    #[must_use]
    pub fn all(parts: Vec<Self>) -> Self {
        let mut kept: Vec<Self> = parts
            .into_iter()
            .filter(|part| !matches!(part, Self::True))
            .collect();

        match kept.len() {
            0 => Self::True,
            1 => kept.remove(0),
            _ => Self::And(kept),
        }
    }
}

///
/// TESTS
///
