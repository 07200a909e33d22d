//! Request-scoped query execution.
//!
//! `list` and `count` are single-shot, stateless calls: each resolves
//! the table fresh, merges the view snapshot with request overrides,
//! compiles, and executes. No iterator or session survives between
//! pages; a continuation cursor is the only carry-over, and it is
//! purely a function of the previous page's last row.

#[cfg(test)]
mod tests;

use crate::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    cursor::{ContinuationSignature, ContinuationToken, CursorBoundary},
    error::{EngineError, ErrorClass, ErrorOrigin},
    obs::sink::{self, ExecKind, ExecSpan, MetricsEvent},
    query::{CompiledQuery, QueryOverrides, QuerySpec, compile},
    store::{Database, Row},
    types::{ColumnId, RowId, TableId, UserId, ViewId},
    value::CellValue,
    view::ViewConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// ListRequest
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub table_id: TableId,
    #[serde(default)]
    pub view_id: Option<ViewId>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(flatten)]
    pub overrides: QueryOverrides,
}

impl ListRequest {
    /// A bare request for one table: no view, no overrides, default
    /// window.
    #[must_use]
    pub fn for_table(table_id: TableId) -> Self {
        Self {
            table_id,
            view_id: None,
            limit: None,
            cursor: None,
            overrides: QueryOverrides::default(),
        }
    }
}

///
/// CountRequest
///
/// Sort overrides are accepted and ignored: ordering cannot change
/// which rows match.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountRequest {
    pub table_id: TableId,
    #[serde(default)]
    pub view_id: Option<ViewId>,
    #[serde(flatten)]
    pub overrides: QueryOverrides,
}

impl CountRequest {
    #[must_use]
    pub fn for_table(table_id: TableId) -> Self {
        Self {
            table_id,
            view_id: None,
            overrides: QueryOverrides::default(),
        }
    }
}

///
/// RowView
///
/// One row as callers see it. Cells stay sparse; absent keys read as
/// null on the client exactly as they do in the engine.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: RowId,
    pub order: i64,
    pub cells: BTreeMap<ColumnId, CellValue>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<&Row> for RowView {
    fn from(row: &Row) -> Self {
        Self {
            id: row.id,
            order: row.order,
            cells: row.cells.clone(),
            created_at: row.created_at_ms,
            updated_at: row.updated_at_ms,
        }
    }
}

///
/// ListPage
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub rows: Vec<RowView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

///
/// CountResponse
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

///
/// RowQueryEngine
///
/// Borrowed execution facade over one store. Construction is free;
/// every method call is one complete request.
///

#[derive(Clone, Copy, Debug)]
pub struct RowQueryEngine<'a> {
    db: &'a Database,
}

impl<'a> RowQueryEngine<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Execute one page request.
    pub fn list(&self, caller: UserId, request: &ListRequest) -> Result<ListPage, EngineError> {
        let table = self.db.table_owned(request.table_id, caller)?;
        let mut span = ExecSpan::start(ExecKind::List, table.id);

        let compiled = self.compile_request(
            table.id,
            request.view_id,
            request.overrides.clone(),
        )?;
        let signature = ContinuationSignature::for_query(table.id, &compiled)?;

        let boundary = request
            .cursor
            .as_deref()
            .map(|cursor| verify_cursor(table.id, cursor, signature))
            .transpose()?;

        let limit = effective_limit(request.limit);

        // Full predicate pass with the sentinel row: one extra match
        // proves a next page without a second query.
        let mut matched: Vec<&Row> = Vec::new();
        let mut scanned: u64 = 0;
        for row in table.rows() {
            scanned += 1;
            if !compiled.predicate.eval(row) {
                continue;
            }
            if let Some(boundary) = &boundary {
                if !compiled.order.admits_after(boundary, row) {
                    continue;
                }
            }
            matched.push(row);
        }
        sink::record(MetricsEvent::RowsScanned {
            table: table.id,
            rows_scanned: scanned,
        });

        matched.sort_by(|left, right| compiled.order.compare(left, right));
        matched.truncate(limit + 1);

        let has_more = matched.len() > limit;
        matched.truncate(limit);

        let next_cursor = if has_more {
            let last = matched
                .last()
                .ok_or_else(|| EngineError::query_invariant("sentinel page kept zero rows"))?;
            let cursor_boundary = CursorBoundary::from_row(last, compiled.order.sort_cell(last));
            let token = ContinuationToken::new(signature, cursor_boundary);
            Some(token.encode().map_err(|err| {
                EngineError::new(ErrorClass::Internal, ErrorOrigin::Cursor, err.to_string())
            })?)
        } else {
            None
        };

        let rows: Vec<RowView> = matched.into_iter().map(RowView::from).collect();
        span.set_rows_returned(u64::try_from(rows.len()).unwrap_or(u64::MAX));

        Ok(ListPage { rows, next_cursor })
    }

    /// Execute one count request. Shares [`Self::list`]'s compilation
    /// path end to end, so the two can never disagree on membership.
    pub fn count(
        &self,
        caller: UserId,
        request: &CountRequest,
    ) -> Result<CountResponse, EngineError> {
        let table = self.db.table_owned(request.table_id, caller)?;
        let _span = ExecSpan::start(ExecKind::Count, table.id);

        let compiled = self.compile_request(
            table.id,
            request.view_id,
            request.overrides.clone(),
        )?;

        let mut scanned: u64 = 0;
        let mut count: u64 = 0;
        for row in table.rows() {
            scanned += 1;
            if compiled.predicate.eval(row) {
                count += 1;
            }
        }
        sink::record(MetricsEvent::RowsScanned {
            table: table.id,
            rows_scanned: scanned,
        });

        Ok(CountResponse { count })
    }

    // Shared spec pipeline: view snapshot -> request overrides ->
    // schema normalization -> compilation. Schema is read fresh from
    // the store on every call.
    fn compile_request(
        &self,
        table_id: TableId,
        view_id: Option<ViewId>,
        overrides: QueryOverrides,
    ) -> Result<CompiledQuery, EngineError> {
        let table = self.db.table(table_id)?;
        let schema = &table.schema;

        let base = match view_id {
            Some(view_id) => {
                let raw = table.view_raw(view_id)?;
                ViewConfig::parse_or_default(raw)
                    .reconciled(schema)
                    .query_spec()
            }
            None => QuerySpec::default(),
        };

        let spec = base.with_overrides(overrides).normalized(schema);

        Ok(compile(&spec, schema))
    }
}

fn effective_limit(requested: Option<u32>) -> usize {
    let limit = requested
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    limit as usize
}

// Decode and verify an untrusted continuation token against the query
// it claims to continue.
fn verify_cursor(
    table: TableId,
    cursor: &str,
    signature: ContinuationSignature,
) -> Result<CursorBoundary, EngineError> {
    let token = ContinuationToken::decode(cursor).map_err(|err| {
        sink::record(MetricsEvent::CursorRejected { table });
        EngineError::cursor_unsupported(err.to_string())
    })?;

    if token.signature() != signature {
        sink::record(MetricsEvent::CursorRejected { table });
        return Err(EngineError::cursor_unsupported(
            "continuation token does not match this query",
        ));
    }

    sink::record(MetricsEvent::CursorResumed { table });

    Ok(token.boundary().clone())
}
