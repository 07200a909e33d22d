use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

///
/// Identifier newtypes
///
/// Typed ULID wrappers so a row id can never be handed to a call site
/// expecting a column id. Serialize as the canonical 26-char ULID text
/// form (the shape persisted configs and cursor payloads carry).
///

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, Deserialize, Display, Eq, From, Hash, Ord, PartialEq,
            PartialOrd, Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Ulid);

        impl $name {
            /// Mint a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Ulid::new())
            }

            /// Construct from a raw u128, for deterministic test fixtures.
            #[must_use]
            pub const fn from_u128(raw: u128) -> Self {
                Self(Ulid::from_parts(
                    (raw >> 80) as u64,
                    raw & ((1_u128 << 80) - 1),
                ))
            }
        }
    };
}

define_id!(
    /// Identity of one table.
    TableId
);
define_id!(
    /// Identity of one column within a table.
    ColumnId
);
define_id!(
    /// Identity of one row. Globally unique, never reused.
    RowId
);
define_id!(
    /// Identity of one persisted view configuration.
    ViewId
);
define_id!(
    /// Identity of the principal that owns tables.
    UserId
);

///
/// TESTS
///
