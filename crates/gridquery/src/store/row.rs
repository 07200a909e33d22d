use crate::{types::ColumnId, types::RowId, value::CellValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Row
///
/// One stored row: immutable identity, an insertion-sequence `order`
/// assigned once at creation, and a sparse cell map. An absent cell key
/// reads as `Null`.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Row {
    pub id: RowId,
    pub order: i64,
    pub cells: BTreeMap<ColumnId, CellValue>,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl Row {
    /// Read one cell, treating an absent key as `Null`.
    #[must_use]
    pub fn cell(&self, column: ColumnId) -> &CellValue {
        self.cells.get(&column).unwrap_or(&CellValue::Null)
    }
}

///
/// TESTS
///
