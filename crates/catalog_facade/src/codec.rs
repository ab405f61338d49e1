//! Marshalling between the [`crate::wire`] record types and the opaque byte blobs the facade's
//! external contract is framed around (§6: "opaque bytes in / opaque bytes out").
//!
//! This crate uses `serde_json` as the concrete encoding, a deliberate stand-in for whatever
//! schema-defined tagged binary format (field IDs, length-prefixed strings, optional-field
//! forward compatibility) a real deployment would pick — see DESIGN.md.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::FacadeError;

/// Encodes `value` into its wire representation.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, FacadeError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decodes `bytes` back into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FacadeError> {
    Ok(serde_json::from_slice(bytes)?)
}
