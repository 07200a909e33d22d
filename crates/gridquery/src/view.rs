use crate::{
    query::{FilterSet, QuerySpec, SortSpec},
    schema::TableSchema,
    types::ColumnId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// RowHeight
///
/// Presentation-only knob carried through the view snapshot. The engine
/// never reads it; it round-trips so saving a view does not lose it.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowHeight {
    #[default]
    Short,
    Medium,
    Tall,
}

///
/// ViewConfig
///
/// Persisted view snapshot. Every field defaults independently, so a
/// config written by an older client (or hand-edited into partial JSON)
/// still parses field by field.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub search: Option<String>,
    pub filters: FilterSet,
    pub sorts: SortSpec,
    pub column_visibility: BTreeMap<ColumnId, bool>,
    pub row_height: RowHeight,
}

impl ViewConfig {
    /// Parse a persisted raw JSON snapshot.
    ///
    /// Malformed JSON is never an error: a snapshot that no longer
    /// parses yields the default config, so a stale view still loads.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Reconcile against the live schema: drop visibility entries for
    /// deleted columns and default every known column to visible.
    /// Filter/sort reconciliation happens later on the merged
    /// [`QuerySpec`], after request overrides are applied.
    #[must_use]
    pub fn reconciled(mut self, schema: &TableSchema) -> Self {
        self.column_visibility
            .retain(|column_id, _| schema.column(*column_id).is_some());

        for column in schema.columns() {
            self.column_visibility.entry(column.id).or_insert(true);
        }

        self
    }

    /// The query portion of the snapshot, as list/count defaults.
    #[must_use]
    pub fn query_spec(&self) -> QuerySpec {
        QuerySpec {
            search: self.search.clone(),
            filters: self.filters.clone(),
            sorts: self.sorts.clone(),
        }
    }
}

///
/// TESTS
///
