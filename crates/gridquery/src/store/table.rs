use crate::{
    error::EngineError,
    schema::TableSchema,
    store::Row,
    types::{ColumnId, RowId, TableId, UserId, ViewId},
    value::CellValue,
};
use std::collections::BTreeMap;

///
/// TableState
///
/// One table's owner, column metadata, persisted view configs (kept as
/// the raw JSON the client saved; parsing happens per read so a stale
/// snapshot can still normalize), and rows keyed by id.
///

#[derive(Clone, Debug)]
pub(crate) struct TableState {
    pub id: TableId,
    pub owner: UserId,
    pub name: String,
    pub schema: TableSchema,
    views: BTreeMap<ViewId, String>,
    rows: BTreeMap<RowId, Row>,
    next_order: i64,
}

impl TableState {
    pub(crate) fn new(id: TableId, owner: UserId, name: String, schema: TableSchema) -> Self {
        Self {
            id,
            owner,
            name,
            schema,
            views: BTreeMap::new(),
            rows: BTreeMap::new(),
            next_order: 1,
        }
    }

    pub(crate) fn view_raw(&self, view: ViewId) -> Result<&str, EngineError> {
        self.views
            .get(&view)
            .map(String::as_str)
            .ok_or_else(|| EngineError::store_not_found("view", view))
    }

    pub(crate) fn save_view(&mut self, view: ViewId, raw: String) {
        self.views.insert(view, raw);
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    pub(crate) fn row_mut(&mut self, row: RowId) -> Result<&mut Row, EngineError> {
        self.rows
            .get_mut(&row)
            .ok_or_else(|| EngineError::store_not_found("row", row))
    }

    /// Insert one row, assigning the next insertion-sequence `order`.
    /// Order values are monotonic per table and never recomputed.
    pub(crate) fn insert_row(
        &mut self,
        cells: BTreeMap<ColumnId, CellValue>,
        now_ms: u64,
    ) -> Result<RowId, EngineError> {
        self.validate_cells(&cells)?;

        let id = RowId::generate();
        let order = self.next_order;
        self.next_order += 1;

        self.rows.insert(
            id,
            Row {
                id,
                order,
                cells,
                created_at_ms: now_ms,
                updated_at_ms: now_ms,
            },
        );

        Ok(id)
    }

    // Write-time validation: cell scalars are checked against column
    // types here so reads never have to.
    fn validate_cells(&self, cells: &BTreeMap<ColumnId, CellValue>) -> Result<(), EngineError> {
        for (column_id, value) in cells {
            let Some(column) = self.schema.column(*column_id) else {
                return Err(EngineError::store_not_found("column", *column_id));
            };
            if !column.accepts(value) {
                return Err(EngineError::store_unsupported(format!(
                    "cell value {value:?} is not storable under {:?} column '{}'",
                    column.ty, column.name,
                )));
            }
        }

        Ok(())
    }

    pub(crate) fn update_cell(
        &mut self,
        row: RowId,
        column_id: ColumnId,
        value: CellValue,
        now_ms: u64,
    ) -> Result<(), EngineError> {
        let Some(column) = self.schema.column(column_id) else {
            return Err(EngineError::store_not_found("column", column_id));
        };
        if !column.accepts(&value) {
            return Err(EngineError::store_unsupported(format!(
                "cell value {value:?} is not storable under {:?} column '{}'",
                column.ty, column.name,
            )));
        }

        let row = self.row_mut(row)?;
        if matches!(value, CellValue::Null) {
            row.cells.remove(&column_id);
        } else {
            row.cells.insert(column_id, value);
        }
        row.updated_at_ms = now_ms;

        Ok(())
    }
}
