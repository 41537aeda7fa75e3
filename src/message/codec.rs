//! Canonical byte-oriented message codec.
//!
//! The serializer is treated as an external collaborator: any canonical
//! byte-oriented encoding would do, and this crate picks one concrete
//! encoding — JSON via `serde_json` — so messages can cross the `cast`
//! boundary as inert bytes and be decoded inside the receiving sandbox.

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Error produced when a message fails to decode inside `recv`.
///
/// A `DecodeError` is treated as a `UserFault` of the receiving actor —
/// it does not propagate to other actors.
#[derive(Debug, Error)]
pub struct DecodeError(#[from] serde_json::Error);

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message decode failed: {}", self.0)
    }
}

/// Encode a value to its canonical byte form.
///
/// Encoding is assumed infallible for the value shapes the runtime
/// exchanges (plain data, no unsupported key types); a script that builds
/// an unencodable value is a user fault surfaced the next time it tries to
/// `cast` it, not a runtime panic — see [`encode_lossy`] for that path.
pub fn encode<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_else(|_| b"null".to_vec())
}

/// Decode a value from its canonical byte form.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(DecodeError)
}

/// Encode a pre-formatted diagnostic line (used by `print`).
pub fn encode_line(line: &str) -> Vec<u8> {
    encode(&line)
}

/// Decode a diagnostic line encoded by [`encode_line`].
pub fn decode_line(bytes: &[u8]) -> Result<String, DecodeError> {
    decode(bytes)
}
