use std::fmt;
use thiserror::Error as ThisError;

///
/// EngineError
///
/// Structured runtime error with a stable internal classification.
/// Only `NotFound` is part of the caller contract; everything else a
/// query can run into (malformed view config, coercion mismatches,
/// unknown operators) resolves silently into result-set semantics.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct EngineError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl EngineError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct the store-origin not-found error used for any identifier
    /// the caller cannot address: absent tables, absent views, and tables
    /// owned by someone else all produce the same surface.
    pub(crate) fn store_not_found(what: &'static str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Store,
            format!("{what} not found: {id}"),
        )
    }

    /// Construct a store-origin unsupported error (e.g. write-time cell
    /// type mismatches).
    pub(crate) fn store_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Store, message)
    }

    /// Construct a cursor-origin unsupported error for rejected
    /// continuation tokens.
    pub(crate) fn cursor_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Cursor, message)
    }

    /// Construct a serialize-origin internal error.
    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message)
    }

    /// Construct a query-origin invariant violation.
    pub(crate) fn query_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Query, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Internal,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Serialize,
    Store,
    Query,
    Cursor,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Serialize => "serialize",
            Self::Store => "store",
            Self::Query => "query",
            Self::Cursor => "cursor",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
