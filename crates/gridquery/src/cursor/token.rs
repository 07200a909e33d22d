use crate::{
    cursor::{ContinuationSignature, CursorBoundary, codec},
    serialize::{deserialize_bounded, serialize},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

const MAX_CONTINUATION_TOKEN_BYTES: usize = 4 * 1024;

///
/// ContinuationToken
///
/// Opaque cursor payload: a continuation boundary bound to the signature
/// of the query that minted it. Callers see only the hex text form.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ContinuationToken {
    signature: ContinuationSignature,
    boundary: CursorBoundary,
}

impl ContinuationToken {
    #[must_use]
    pub const fn new(signature: ContinuationSignature, boundary: CursorBoundary) -> Self {
        Self {
            signature,
            boundary,
        }
    }

    #[must_use]
    pub const fn signature(&self) -> ContinuationSignature {
        self.signature
    }

    #[must_use]
    pub const fn boundary(&self) -> &CursorBoundary {
        &self.boundary
    }

    /// Encode into the opaque hex text form handed to callers.
    pub fn encode(&self) -> Result<String, ContinuationTokenError> {
        let wire = ContinuationTokenWire {
            version: CursorTokenVersion::V1.encode(),
            signature: self.signature.into_bytes(),
            boundary: self.boundary.clone(),
        };

        let bytes =
            serialize(&wire).map_err(|err| ContinuationTokenError::Encode(err.to_string()))?;

        Ok(codec::encode_token(&bytes))
    }

    /// Decode an untrusted caller-supplied token.
    pub fn decode(token: &str) -> Result<Self, ContinuationTokenError> {
        let bytes = codec::decode_token(token)
            .map_err(|err| ContinuationTokenError::Decode(err.to_string()))?;

        let wire: ContinuationTokenWire =
            deserialize_bounded(&bytes, MAX_CONTINUATION_TOKEN_BYTES)
                .map_err(|err| ContinuationTokenError::Decode(err.to_string()))?;

        // Version gates compatibility before any field is trusted.
        CursorTokenVersion::decode(wire.version)?;

        Ok(Self {
            signature: ContinuationSignature::from_bytes(wire.signature),
            boundary: wire.boundary,
        })
    }

    #[cfg(test)]
    pub(crate) fn encode_with_version_for_test(
        &self,
        version: u8,
    ) -> Result<String, ContinuationTokenError> {
        let wire = ContinuationTokenWire {
            version,
            signature: self.signature.into_bytes(),
            boundary: self.boundary.clone(),
        };

        let bytes =
            serialize(&wire).map_err(|err| ContinuationTokenError::Encode(err.to_string()))?;

        Ok(codec::encode_token(&bytes))
    }
}

///
/// ContinuationTokenError
/// Cursor token encoding/decoding failures.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ContinuationTokenError {
    #[error("failed to encode continuation token: {0}")]
    Encode(String),

    #[error("failed to decode continuation token: {0}")]
    Decode(String),

    #[error("unsupported continuation token version: {version}")]
    UnsupportedVersion { version: u8 },
}

///
/// CursorTokenVersion
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CursorTokenVersion {
    V1,
}

impl CursorTokenVersion {
    const fn encode(self) -> u8 {
        match self {
            Self::V1 => 1,
        }
    }

    const fn decode(version: u8) -> Result<Self, ContinuationTokenError> {
        match version {
            1 => Ok(Self::V1),
            _ => Err(ContinuationTokenError::UnsupportedVersion { version }),
        }
    }
}

///
/// ContinuationTokenWire
///

#[derive(Deserialize, Serialize)]
struct ContinuationTokenWire {
    version: u8,
    signature: [u8; 32],
    boundary: CursorBoundary,
}

///
/// TESTS
///
