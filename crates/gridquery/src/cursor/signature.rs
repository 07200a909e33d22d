use crate::{
    cursor::codec,
    query::CompiledQuery,
    serialize::{SerializeError, serialize},
    types::TableId,
};
use serde::Serialize;
use sha2::{Digest, Sha256};

///
/// ContinuationSignature
///
/// Deterministic hash of continuation-relevant query semantics: the
/// table, the compiled predicate, and the ordering plan. Excludes
/// windowing state (`limit`) and the boundary itself. A cursor minted
/// under one signature is rejected when presented under another, so a
/// caller cannot resume a walk with a different filter, search, sort,
/// or table and silently get inconsistent pages.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ContinuationSignature([u8; 32]);

impl ContinuationSignature {
    pub(crate) const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub(crate) const fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        codec::encode_token(&self.0)
    }

    /// Derive the signature for one compiled query against one table.
    pub fn for_query(
        table_id: TableId,
        query: &CompiledQuery,
    ) -> Result<Self, SerializeError> {
        let scope = SignatureScope { table_id, query };
        let bytes = serialize(&scope)?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);

        Ok(Self(hasher.finalize().into()))
    }
}

impl std::fmt::Display for ContinuationSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_hex())
    }
}

// Canonical hash input. The CBOR encoding of this struct is the byte
// stream that gets hashed; field order is part of the format.
#[derive(Serialize)]
struct SignatureScope<'a> {
    table_id: TableId,
    query: &'a CompiledQuery,
}

///
/// TESTS
///
