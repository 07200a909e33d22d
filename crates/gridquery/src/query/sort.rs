use crate::types::ColumnId;
use serde::{Deserialize, Serialize};

///
/// SortDirection
///
/// Canonical traversal direction shared by compilation, continuation
/// boundaries, and the SQL renderer.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }
}

///
/// SortKey
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    pub column_id: ColumnId,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    #[must_use]
    pub const fn new(column_id: ColumnId, direction: SortDirection) -> Self {
        Self {
            column_id,
            direction,
        }
    }
}

///
/// SortSpec
///
/// Multi-key sort is accepted as input, but only the first entry is
/// load-bearing: ordering disambiguates by row id, not by secondary
/// keys.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SortSpec {
    pub keys: Vec<SortKey>,
}

impl SortSpec {
    #[must_use]
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// The primary sort key, the only entry that affects ordering and
    /// cursor shape.
    #[must_use]
    pub fn primary(&self) -> Option<SortKey> {
        self.keys.first().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

///
/// TESTS
///
