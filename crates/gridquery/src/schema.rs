use crate::{types::ColumnId, value::CellValue};
use serde::{Deserialize, Serialize};

///
/// ColumnType
///
/// Governs how cell values coerce for comparison (numeric cast vs. raw
/// text) and which filter operators a condition may carry.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    Text,
    Number,
}

///
/// Column
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            id: ColumnId::generate(),
            name: name.into(),
            ty,
        }
    }

    /// Whether one scalar is storable under this column's type.
    ///
    /// NUMBER columns accept numeric scalars and numeric-looking text
    /// (the sparse store keeps text-encoded numerics from older writers);
    /// `Null` is storable everywhere.
    #[must_use]
    pub fn accepts(&self, value: &CellValue) -> bool {
        match (self.ty, value) {
            (_, CellValue::Null) | (ColumnType::Text, CellValue::Text(_)) => true,
            (ColumnType::Text, CellValue::Number(_)) => false,
            (ColumnType::Number, CellValue::Number(n)) => n.is_finite(),
            (ColumnType::Number, CellValue::Text(text)) => {
                text.is_empty() || CellValue::Text(text.clone()).as_numeric().is_some()
            }
        }
    }
}

///
/// TableSchema
///
/// Per-call snapshot of a table's column metadata. The engine reads this
/// fresh from the store on every request and never caches it.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TableSchema {
    columns: Vec<Column>,
}

impl TableSchema {
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    #[must_use]
    pub fn column_type(&self, id: ColumnId) -> Option<ColumnType> {
        self.column(id).map(|column| column.ty)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_columns_accept_numeric_text_and_reject_prose() {
        let column = Column::new("amount", ColumnType::Number);
        assert!(column.accepts(&CellValue::Number(3.5)));
        assert!(column.accepts(&CellValue::Text("42".into())));
        assert!(column.accepts(&CellValue::Text(String::new())));
        assert!(column.accepts(&CellValue::Null));
        assert!(!column.accepts(&CellValue::Text("abc".into())));
        assert!(!column.accepts(&CellValue::Number(f64::NAN)));
    }

    #[test]
    fn text_columns_reject_numeric_scalars() {
        let column = Column::new("label", ColumnType::Text);
        assert!(column.accepts(&CellValue::Text("x".into())));
        assert!(column.accepts(&CellValue::Null));
        assert!(!column.accepts(&CellValue::Number(1.0)));
    }

    #[test]
    fn schema_lookup_by_column_id() {
        let amount = Column::new("amount", ColumnType::Number);
        let amount_id = amount.id;
        let schema = TableSchema::new(vec![amount, Column::new("label", ColumnType::Text)]);

        assert_eq!(schema.column_type(amount_id), Some(ColumnType::Number));
        assert_eq!(schema.column_type(ColumnId::from_u128(999)), None);
        assert_eq!(schema.columns().len(), 2);
    }
}
