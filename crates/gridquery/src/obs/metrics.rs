//! Ephemeral in-memory counters for query execution.
//!
//! State is thread-local: each request-serving thread accumulates its
//! own window, and tests observe only their own activity.

use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

///
/// EventState
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub tables: BTreeMap<String, TableCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Engine entrypoints
    pub list_calls: u64,
    pub count_calls: u64,

    // Rows touched
    pub rows_scanned: u64,
    pub rows_listed: u64,

    // Continuation traffic
    pub cursor_resumes: u64,
    pub cursor_rejections: u64,
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TableCounters {
    pub list_calls: u64,
    pub count_calls: u64,
    pub rows_scanned: u64,
    pub rows_listed: u64,
}

pub(crate) fn with_state_mut<T>(f: impl FnOnce(&mut EventState) -> T) -> T {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Snapshot the current window for endpoint/test plumbing.
#[must_use]
pub fn report() -> EventState {
    STATE.with(|state| state.borrow().clone())
}

/// Reset the current window.
pub fn reset_all() {
    STATE.with(|state| *state.borrow_mut() = EventState::default());
}

///
/// TESTS
///
