//! Row query engine for sparse grid tables: filter/search compilation,
//! NULLS-LAST ordering, and keyset pagination with opaque continuation
//! cursors. Execution runs against the bundled in-memory row store; the
//! same compiled query lowers to parameter-bound SQL via [`sql`].

pub mod cursor;
pub mod engine;
pub mod error;
pub mod obs;
pub mod query;
pub mod schema;
pub mod serialize;
pub mod sql;
pub mod store;
pub mod types;
pub mod value;
pub mod view;

///
/// CONSTANTS
///

/// Page size applied when a list request carries no explicit limit.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Hard ceiling on the page size of one list request.
///
/// Requests above this are clamped, not rejected; one page must stay a
/// bounded unit of work regardless of caller input.
pub const MAX_PAGE_SIZE: u32 = 200;

///
/// Prelude
///
/// Domain vocabulary only. No errors, executors, or codec helpers are
/// re-exported here.
///

pub mod prelude {
    pub use crate::{
        query::{Conjunction, FilterCondition, FilterOperator, FilterSet, SortDirection, SortKey},
        schema::{Column, ColumnType},
        types::{ColumnId, RowId, TableId, UserId, ViewId},
        value::CellValue,
    };
}
