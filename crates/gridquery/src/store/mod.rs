mod row;
mod table;

pub use row::Row;
pub(crate) use table::TableState;

use crate::{
    error::EngineError,
    schema::{Column, TableSchema},
    types::{ColumnId, RowId, TableId, UserId, ViewId},
    value::CellValue,
};
use std::{
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// Database
///
/// In-memory row store: tables keyed by id, each holding owner, schema,
/// persisted views, and rows. Writes are independent single-row
/// operations; queries never mutate, so an in-flight pagination walk
/// only ever observes complete rows.
///

#[derive(Debug, Default)]
pub struct Database {
    tables: BTreeMap<TableId, TableState>,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table owned by `owner` and return its id.
    pub fn create_table(
        &mut self,
        owner: UserId,
        name: impl Into<String>,
        columns: Vec<Column>,
    ) -> TableId {
        let id = TableId::generate();
        self.tables.insert(
            id,
            TableState::new(id, owner, name.into(), TableSchema::new(columns)),
        );

        id
    }

    /// Persist one view configuration snapshot as raw JSON.
    ///
    /// The payload is stored verbatim; malformed JSON is accepted here
    /// and normalizes to defaults at read time, so a snapshot that goes
    /// stale under a schema change keeps loading.
    pub fn save_view(&mut self, table: TableId, raw_config: String) -> Result<ViewId, EngineError> {
        let view = ViewId::generate();
        self.table_mut(table)?.save_view(view, raw_config);

        Ok(view)
    }

    /// Insert one row with write-time cell type validation. The row's
    /// `order` is the table's next insertion-sequence value.
    pub fn insert_row(
        &mut self,
        table: TableId,
        cells: BTreeMap<ColumnId, CellValue>,
    ) -> Result<RowId, EngineError> {
        let now = now_ms();
        self.table_mut(table)?.insert_row(cells, now)
    }

    /// Overwrite one cell. A `Null` write clears the key so absent and
    /// null cells stay indistinguishable.
    pub fn update_cell(
        &mut self,
        table: TableId,
        row: RowId,
        column: ColumnId,
        value: CellValue,
    ) -> Result<(), EngineError> {
        let now = now_ms();
        self.table_mut(table)?.update_cell(row, column, value, now)
    }

    pub(crate) fn table(&self, id: TableId) -> Result<&TableState, EngineError> {
        self.tables
            .get(&id)
            .ok_or_else(|| EngineError::store_not_found("table", id))
    }

    /// Resolve a table for `caller`. A table owned by someone else is
    /// reported exactly like an absent one: callers get no existence
    /// oracle over other principals' tables.
    pub(crate) fn table_owned(
        &self,
        id: TableId,
        caller: UserId,
    ) -> Result<&TableState, EngineError> {
        let table = self.table(id)?;
        if table.owner != caller {
            return Err(EngineError::store_not_found("table", id));
        }

        Ok(table)
    }

    fn table_mut(&mut self, id: TableId) -> Result<&mut TableState, EngineError> {
        self.tables
            .get_mut(&id)
            .ok_or_else(|| EngineError::store_not_found("table", id))
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

///
/// TESTS
///
