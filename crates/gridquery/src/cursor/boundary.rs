use crate::{store::Row, types::RowId, value::CellValue};
use serde::{Deserialize, Serialize};

///
/// CursorBoundary
///
/// The sort-relevant fields of the last row a page returned. Purely a
/// function of that row — never a snapshot timestamp or offset — which
/// is what keeps concurrent inserts from corrupting an in-flight walk.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CursorBoundary {
    pub row_id: RowId,
    pub anchor: CursorAnchor,
}

///
/// CursorAnchor
///
/// `Order` when the page ran under default insertion order, `SortValue`
/// (the raw cell value, `Null` when the cell was empty or absent) when a
/// primary sort was active.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum CursorAnchor {
    Order(i64),
    SortValue(CellValue),
}

impl CursorBoundary {
    /// Capture the boundary from the last kept row of a page.
    #[must_use]
    pub fn from_row(row: &Row, sort_cell: Option<&CellValue>) -> Self {
        let anchor = match sort_cell {
            Some(cell) if !cell.is_empty_cell() => CursorAnchor::SortValue(cell.clone()),
            // Empty-string and absent cells mint the same null anchor;
            // both sort in the trailing NULL block.
            Some(_) => CursorAnchor::SortValue(CellValue::Null),
            None => CursorAnchor::Order(row.order),
        };

        Self {
            row_id: row.id,
            anchor,
        }
    }

    /// Whether this boundary's shape matches an active-sort query.
    #[must_use]
    pub const fn is_sort_anchor(&self) -> bool {
        matches!(self.anchor, CursorAnchor::SortValue(_))
    }
}

///
/// TESTS
///
