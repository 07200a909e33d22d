use crate::serialize::SerializeError;
use serde::{Serialize, de::DeserializeOwned};
use serde_cbor::{from_slice, to_vec};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Serialize a value into CBOR bytes.
pub(super) fn serialize<T>(t: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    to_vec(t).map_err(|e| SerializeError::Serialize(e.to_string()))
}

/// Deserialize CBOR bytes, treating them as untrusted input.
///
/// The caller supplies the byte cap for its payload class; the decoder
/// itself runs under `catch_unwind` because decode panics on malformed
/// input must surface as ordinary errors.
pub(super) fn deserialize_bounded<T>(bytes: &[u8], max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    if bytes.len() > max_bytes {
        return Err(SerializeError::Deserialize(format!(
            "payload of {} bytes exceeds the {max_bytes}-byte decode bound",
            bytes.len()
        )));
    }

    catch_unwind(AssertUnwindSafe(|| from_slice(bytes)))
        .map_err(|_| SerializeError::Deserialize("decoder panicked on malformed input".into()))?
        .map_err(|err: serde_cbor::Error| SerializeError::Deserialize(err.to_string()))
}

///
/// TESTS
///
