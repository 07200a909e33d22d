use crate::{
    query::{FilterSet, SortSpec},
    schema::TableSchema,
};
use serde::{Deserialize, Serialize};

///
/// QuerySpec
///
/// The declarative inputs of one list/count call after view defaults and
/// request overrides are merged: free-text search, a flat filter set, and
/// a sort spec. Still schema-unaware; [`QuerySpec::normalized`] reconciles
/// it against the live schema before compilation.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuerySpec {
    pub search: Option<String>,
    pub filters: FilterSet,
    pub sorts: SortSpec,
}

///
/// QueryOverrides
///
/// Per-request overrides over a view's saved query. Merging is shallow
/// and field-wise: a present field replaces the view's value wholesale,
/// an absent field inherits it. There is no per-condition merging.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryOverrides {
    pub search: Option<String>,
    pub filters: Option<FilterSet>,
    pub sorts: Option<SortSpec>,
}

impl QueryOverrides {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.filters.is_none() && self.sorts.is_none()
    }
}

impl QuerySpec {
    /// Overlay request overrides onto this (view-derived) spec.
    #[must_use]
    pub fn with_overrides(mut self, overrides: QueryOverrides) -> Self {
        if let Some(search) = overrides.search {
            self.search = Some(search);
        }
        if let Some(filters) = overrides.filters {
            self.filters = filters;
        }
        if let Some(sorts) = overrides.sorts {
            self.sorts = sorts;
        }
        self
    }

    /// Reconcile against the live schema.
    ///
    /// Saved configs go stale when columns are deleted: conditions and
    /// sort keys referencing unknown columns are dropped silently rather
    /// than failing the request. Search text is trimmed, and trimmed-empty
    /// search means no search at all.
    #[must_use]
    pub fn normalized(mut self, schema: &TableSchema) -> Self {
        self.search = self
            .search
            .map(|search| search.trim().to_string())
            .filter(|search| !search.is_empty());

        self.filters
            .conditions
            .retain(|condition| schema.column(condition.column_id).is_some());

        self.sorts
            .keys
            .retain(|key| schema.column(key.column_id).is_some());

        self
    }
}

///
/// TESTS
///
