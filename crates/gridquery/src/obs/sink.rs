//! Metrics sink boundary.
//!
//! Engine logic never touches obs::metrics directly; all
//! instrumentation flows through MetricsEvent and MetricsSink, so the
//! counters can be swapped out at one seam.

use crate::{obs::metrics, types::TableId};

///
/// ExecKind
///

#[derive(Clone, Copy, Debug)]
pub enum ExecKind {
    List,
    Count,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    ExecStart {
        kind: ExecKind,
        table: TableId,
    },
    ExecFinish {
        kind: ExecKind,
        table: TableId,
        rows_returned: u64,
    },
    RowsScanned {
        table: TableId,
        rows_scanned: u64,
    },
    CursorResumed {
        table: TableId,
    },
    CursorRejected {
        table: TableId,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ExecStart { kind, table } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        ExecKind::List => m.ops.list_calls = m.ops.list_calls.saturating_add(1),
                        ExecKind::Count => {
                            m.ops.count_calls = m.ops.count_calls.saturating_add(1);
                        }
                    }

                    let entry = m.tables.entry(table.to_string()).or_default();
                    match kind {
                        ExecKind::List => {
                            entry.list_calls = entry.list_calls.saturating_add(1);
                        }
                        ExecKind::Count => {
                            entry.count_calls = entry.count_calls.saturating_add(1);
                        }
                    }
                });
            }

            MetricsEvent::ExecFinish {
                kind,
                table,
                rows_returned,
            } => {
                metrics::with_state_mut(|m| {
                    if matches!(kind, ExecKind::List) {
                        m.ops.rows_listed = m.ops.rows_listed.saturating_add(rows_returned);
                        let entry = m.tables.entry(table.to_string()).or_default();
                        entry.rows_listed = entry.rows_listed.saturating_add(rows_returned);
                    }
                });
            }

            MetricsEvent::RowsScanned {
                table,
                rows_scanned,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows_scanned);
                    let entry = m.tables.entry(table.to_string()).or_default();
                    entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
                });
            }

            MetricsEvent::CursorResumed { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.cursor_resumes = m.ops.cursor_resumes.saturating_add(1);
                });
            }

            MetricsEvent::CursorRejected { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.cursor_rejections = m.ops.cursor_rejections.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    GLOBAL_METRICS_SINK.record(event);
}

/// Snapshot the current metrics window for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> metrics::EventState {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

///
/// ExecSpan
///
/// RAII execution span: records the start on construction and the
/// finish on drop, so every exit path of an operation reports.
///

pub(crate) struct ExecSpan {
    kind: ExecKind,
    table: TableId,
    rows_returned: u64,
}

impl ExecSpan {
    pub(crate) fn start(kind: ExecKind, table: TableId) -> Self {
        record(MetricsEvent::ExecStart { kind, table });
        Self {
            kind,
            table,
            rows_returned: 0,
        }
    }

    pub(crate) fn set_rows_returned(&mut self, rows_returned: u64) {
        self.rows_returned = rows_returned;
    }
}

impl Drop for ExecSpan {
    fn drop(&mut self) {
        record(MetricsEvent::ExecFinish {
            kind: self.kind,
            table: self.table,
            rows_returned: self.rows_returned,
        });
    }
}

///
/// TESTS
///
