use crate::{
    cursor::{CursorAnchor, CursorBoundary},
    query::SortDirection,
    schema::ColumnType,
    store::Row,
    types::{ColumnId, RowId},
    value::{CellValue, compare_nulls_last},
};
use serde::Serialize;
use std::cmp::Ordering;

///
/// OrderKey
///
/// Resolved primary sort key: the column survived normalization, so its
/// type is known and fixes how cells coerce into sort values.
///

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrderKey {
    pub column: ColumnId,
    pub ty: ColumnType,
    pub direction: SortDirection,
}

///
/// OrderPlan
///
/// Total ordering over rows. `key: None` is default insertion order
/// (`order ASC, id ASC`); with a key, rows order by coerced cell value
/// in the key direction with empty cells in a trailing NULL block and
/// row id as the directed tie-break.
///
/// Serializes into the continuation signature: a cursor minted under
/// one ordering must not resume under another.
///

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct OrderPlan {
    pub key: Option<OrderKey>,
}

///
/// SortValue
///
/// Coerced comparison key for one cell under an active sort. Empty and
/// uncoercible cells have no sort value and land in the NULL block.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(l), Self::Number(r)) => l.total_cmp(r),
            (Self::Text(l), Self::Text(r)) => l.cmp(r),
            // One plan produces one key kind; a mixed pair still needs a
            // deterministic answer.
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl OrderPlan {
    #[must_use]
    pub const fn default_order() -> Self {
        Self { key: None }
    }

    #[must_use]
    pub const fn sorted(key: OrderKey) -> Self {
        Self { key: Some(key) }
    }

    /// The raw cell a continuation boundary anchors on, if a sort is
    /// active.
    #[must_use]
    pub fn sort_cell<'a>(&self, row: &'a Row) -> Option<&'a CellValue> {
        self.key.map(|key| row.cell(key.column))
    }

    /// Coerce one cell into this plan's sort key space.
    #[must_use]
    pub fn key_of_cell(&self, cell: &CellValue) -> Option<SortValue> {
        let key = self.key?;
        if cell.is_empty_cell() {
            return None;
        }

        match key.ty {
            ColumnType::Number => cell.as_numeric().map(SortValue::Number),
            ColumnType::Text => Some(SortValue::Text(cell.text_form())),
        }
    }

    /// Total row ordering: sort value in the key direction, NULLs last
    /// regardless of direction, row id as the directed tie-break.
    #[must_use]
    pub fn compare(&self, left: &Row, right: &Row) -> Ordering {
        let Some(key) = self.key else {
            return (left.order, left.id).cmp(&(right.order, right.id));
        };

        let lk = self.key_of_cell(left.cell(key.column));
        let rk = self.key_of_cell(right.cell(key.column));

        let by_value = compare_nulls_last(lk.as_ref(), rk.as_ref(), |l, r| {
            apply_direction(l.compare(r), key.direction)
        });

        by_value.then_with(|| apply_direction(left.id.cmp(&right.id), key.direction))
    }

    /// Strict keyset admission: whether `row` lies after `boundary` in
    /// this ordering. Rows equal to the boundary row are excluded, which
    /// is what makes adjacent pages disjoint.
    #[must_use]
    pub fn admits_after(&self, boundary: &CursorBoundary, row: &Row) -> bool {
        match (&boundary.anchor, self.key) {
            (CursorAnchor::Order(order), _) => {
                (row.order, row.id) > (*order, boundary.row_id)
            }
            (CursorAnchor::SortValue(anchor), Some(key)) => {
                let anchor_key = self.key_of_cell(anchor);
                let row_key = self.key_of_cell(row.cell(key.column));

                match (anchor_key, row_key) {
                    // Boundary sat inside the trailing NULL block: only
                    // later NULL-block rows remain.
                    (None, None) => id_after(row.id, boundary.row_id, key.direction),
                    (None, Some(_)) => false,
                    // Boundary had a value: the whole NULL block is
                    // still ahead.
                    (Some(_), None) => true,
                    (Some(anchor_key), Some(row_key)) => {
                        match apply_direction(row_key.compare(&anchor_key), key.direction) {
                            Ordering::Greater => true,
                            Ordering::Equal => id_after(row.id, boundary.row_id, key.direction),
                            Ordering::Less => false,
                        }
                    }
                }
            }
            // Sort-shaped boundary against a default-order plan; the
            // signature check upstream rejects this before it evaluates.
            (CursorAnchor::SortValue(_), None) => false,
        }
    }
}

const fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    if direction.is_desc() {
        ordering.reverse()
    } else {
        ordering
    }
}

fn id_after(row_id: RowId, boundary_id: RowId, direction: SortDirection) -> bool {
    apply_direction(row_id.cmp(&boundary_id), direction) == Ordering::Greater
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowId;
    use std::collections::BTreeMap;

    fn column() -> ColumnId {
        ColumnId::from_u128(7)
    }

    fn row(id: u128, order: i64, cell: Option<CellValue>) -> Row {
        let cells = cell
            .map(|value| BTreeMap::from([(column(), value)]))
            .unwrap_or_default();

        Row {
            id: RowId::from_u128(id),
            order,
            cells,
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }

    fn number_plan(direction: SortDirection) -> OrderPlan {
        OrderPlan::sorted(OrderKey {
            column: column(),
            ty: ColumnType::Number,
            direction,
        })
    }

    #[test]
    fn default_order_compares_by_order_then_id() {
        let plan = OrderPlan::default_order();
        assert_eq!(
            plan.compare(&row(1, 5, None), &row(2, 6, None)),
            Ordering::Less
        );
        assert_eq!(
            plan.compare(&row(1, 5, None), &row(2, 5, None)),
            Ordering::Less
        );
    }

    #[test]
    fn empty_cells_sort_last_in_both_directions() {
        let valued = row(1, 1, Some(CellValue::Number(3.0)));
        let empty_text = row(2, 2, Some(CellValue::Text(String::new())));
        let absent = row(3, 3, None);

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let plan = number_plan(direction);
            assert_eq!(plan.compare(&valued, &empty_text), Ordering::Less);
            assert_eq!(plan.compare(&valued, &absent), Ordering::Less);
            assert_eq!(plan.compare(&absent, &valued), Ordering::Greater);
        }
    }

    #[test]
    fn desc_reverses_values_and_id_tie_break() {
        let plan = number_plan(SortDirection::Desc);
        let low = row(1, 1, Some(CellValue::Number(1.0)));
        let high = row(2, 2, Some(CellValue::Number(9.0)));
        assert_eq!(plan.compare(&high, &low), Ordering::Less);

        let tie_a = row(1, 1, Some(CellValue::Number(5.0)));
        let tie_b = row(2, 2, Some(CellValue::Number(5.0)));
        assert_eq!(plan.compare(&tie_b, &tie_a), Ordering::Less);
    }

    #[test]
    fn numeric_sort_coerces_text_cells() {
        let plan = number_plan(SortDirection::Asc);
        let text_nine = row(1, 1, Some(CellValue::Text("9".into())));
        let native_ten = row(2, 2, Some(CellValue::Number(10.0)));
        assert_eq!(plan.compare(&text_nine, &native_ten), Ordering::Less);
    }

    #[test]
    fn default_order_admission_is_strict() {
        let plan = OrderPlan::default_order();
        let last = row(5, 10, None);
        let boundary = CursorBoundary::from_row(&last, None);

        assert!(!plan.admits_after(&boundary, &last));
        assert!(!plan.admits_after(&boundary, &row(4, 9, None)));
        assert!(plan.admits_after(&boundary, &row(6, 11, None)));
        // Same order, later id still advances.
        assert!(plan.admits_after(&boundary, &row(6, 10, None)));
    }

    #[test]
    fn valued_boundary_admits_the_null_block() {
        let plan = number_plan(SortDirection::Asc);
        let last = row(5, 5, Some(CellValue::Number(7.0)));
        let boundary = CursorBoundary::from_row(&last, plan.sort_cell(&last));

        assert!(plan.admits_after(&boundary, &row(1, 1, None)));
        assert!(plan.admits_after(&boundary, &row(2, 2, Some(CellValue::Number(8.0)))));
        assert!(!plan.admits_after(&boundary, &row(3, 3, Some(CellValue::Number(7.0)))));
        assert!(plan.admits_after(&boundary, &row(9, 9, Some(CellValue::Number(7.0)))));
    }

    #[test]
    fn null_boundary_admits_only_later_null_rows() {
        let plan = number_plan(SortDirection::Asc);
        let last = row(5, 5, None);
        let boundary = CursorBoundary::from_row(&last, plan.sort_cell(&last));
        assert!(boundary.is_sort_anchor());

        assert!(!plan.admits_after(&boundary, &row(4, 4, None)));
        assert!(plan.admits_after(&boundary, &row(6, 6, None)));
        assert!(!plan.admits_after(&boundary, &row(9, 9, Some(CellValue::Number(1.0)))));
    }

    #[test]
    fn desc_admission_walks_downward() {
        let plan = number_plan(SortDirection::Desc);
        let last = row(5, 5, Some(CellValue::Number(7.0)));
        let boundary = CursorBoundary::from_row(&last, plan.sort_cell(&last));

        assert!(plan.admits_after(&boundary, &row(1, 1, Some(CellValue::Number(3.0)))));
        assert!(!plan.admits_after(&boundary, &row(2, 2, Some(CellValue::Number(9.0)))));
        assert!(plan.admits_after(&boundary, &row(3, 3, Some(CellValue::Number(7.0)))));
        assert!(!plan.admits_after(&boundary, &row(9, 9, Some(CellValue::Number(7.0)))));
        assert!(plan.admits_after(&boundary, &row(9, 9, None)));
    }
}
