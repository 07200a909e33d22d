mod cursor_validation;

use crate::{
    engine::{CountRequest, ListPage, ListRequest, RowQueryEngine, RowView},
    query::{
        Conjunction, FilterCondition, FilterOperator, FilterSet, QueryOverrides, SortDirection,
        SortKey, SortSpec,
    },
    schema::{Column, ColumnType},
    store::Database,
    types::{ColumnId, RowId, TableId, UserId},
    value::CellValue,
};
use std::collections::BTreeMap;

///
/// Fixture
///
/// One owner, one table with a TEXT "name" column and a NUMBER "amount"
/// column. Cells are inserted sparsely: a `None` stays absent.
///

struct Fixture {
    db: Database,
    owner: UserId,
    table: TableId,
    name: ColumnId,
    amount: ColumnId,
}

impl Fixture {
    fn new() -> Self {
        let owner = UserId::from_u128(1);
        let name = Column::new("name", ColumnType::Text);
        let amount = Column::new("amount", ColumnType::Number);
        let (name_id, amount_id) = (name.id, amount.id);

        let mut db = Database::new();
        let table = db.create_table(owner, "grid", vec![name, amount]);

        Self {
            db,
            owner,
            table,
            name: name_id,
            amount: amount_id,
        }
    }

    fn insert(&mut self, name: Option<&str>, amount: Option<f64>) -> RowId {
        let mut cells = BTreeMap::new();
        if let Some(name) = name {
            cells.insert(self.name, CellValue::Text(name.to_string()));
        }
        if let Some(amount) = amount {
            cells.insert(self.amount, CellValue::Number(amount));
        }

        self.db
            .insert_row(self.table, cells)
            .expect("insert should succeed")
    }

    fn list(&self, request: &ListRequest) -> ListPage {
        RowQueryEngine::new(&self.db)
            .list(self.owner, request)
            .expect("list should succeed")
    }

    fn count(&self, request: &CountRequest) -> u64 {
        RowQueryEngine::new(&self.db)
            .count(self.owner, request)
            .expect("count should succeed")
            .count
    }

    /// Exhaustively paginate one request, following cursors until the
    /// engine reports no next page.
    fn paginate_all(&self, mut request: ListRequest) -> Vec<RowView> {
        let mut rows = Vec::new();
        loop {
            let page = self.list(&request);
            rows.extend(page.rows);
            match page.next_cursor {
                Some(cursor) => request.cursor = Some(cursor),
                None => return rows,
            }
        }
    }
}

fn contains(column: ColumnId, needle: &str) -> FilterCondition {
    FilterCondition::new(
        column,
        FilterOperator::Contains,
        CellValue::Text(needle.to_string()),
    )
}

fn gt(column: ColumnId, value: f64) -> FilterCondition {
    FilterCondition::new(column, FilterOperator::Gt, CellValue::Number(value))
}

fn filters(conjunction: Conjunction, conditions: Vec<FilterCondition>) -> QueryOverrides {
    QueryOverrides {
        filters: Some(FilterSet::new(conjunction, conditions)),
        ..QueryOverrides::default()
    }
}

fn sort_by(column: ColumnId, direction: SortDirection) -> QueryOverrides {
    QueryOverrides {
        sorts: Some(SortSpec::new(vec![SortKey::new(column, direction)])),
        ..QueryOverrides::default()
    }
}

fn row_names(rows: &[RowView], name: ColumnId) -> Vec<String> {
    rows.iter().map(|row| cell_text(row, name)).collect()
}

fn cell_text(row: &RowView, column: ColumnId) -> String {
    row.cells
        .get(&column)
        .map(CellValue::text_form)
        .unwrap_or_default()
}
