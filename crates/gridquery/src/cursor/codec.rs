//! Hex text form of cursor payloads.
//!
//! Continuation tokens travel as plain lowercase hex so they survive
//! URLs, logs, and copy-paste without further escaping. Decoding
//! treats the input as untrusted: length is validated up front and
//! nothing is allocated for input that cannot possibly be a token.

use thiserror::Error as ThisError;

const MAX_TOKEN_CHARS: usize = 8 * 1024;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

///
/// CursorDecodeError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum CursorDecodeError {
    #[error("cursor token length {len} is not usable hex")]
    BadLength { len: usize },

    #[error("cursor token contains non-hex input")]
    NotHex,
}

/// Encode raw cursor bytes as lowercase hex.
#[must_use]
pub fn encode_token(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX_DIGITS[usize::from(byte >> 4)]);
        out.push(HEX_DIGITS[usize::from(byte & 0x0f)]);
    }

    // Every pushed byte is an ASCII hex digit.
    String::from_utf8(out).unwrap_or_default()
}

/// Decode a caller-supplied hex token into raw bytes.
///
/// Surrounding whitespace is tolerated, hex case is not significant.
/// Empty, odd-length, and oversized inputs all fail the same length
/// check; only well-sized input gets a content pass.
pub fn decode_token(token: &str) -> Result<Vec<u8>, CursorDecodeError> {
    let token = token.trim();
    let len = token.len();

    if len == 0 || len % 2 != 0 || len > MAX_TOKEN_CHARS {
        return Err(CursorDecodeError::BadLength { len });
    }

    token
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| Ok((hex_value(pair[0])? << 4) | hex_value(pair[1])?))
        .collect()
}

const fn hex_value(digit: u8) -> Result<u8, CursorDecodeError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(CursorDecodeError::NotHex),
    }
}

///
/// TESTS
///
