//! crates/sg_io/src/hasher.rs
//!
//! Deterministic hashing and ID builders.
//!
//! - `sha256_hex(..)` for raw input bytes (the source CSV, as read by the loader).
//! - `sha256_json(..)` for serializable values: compact `serde_json` bytes,
//!   struct fields in declaration order, so equal values hash equally.
//! - `run_id_from_json(..)` builds `RUN:<hex64>` over a record without its id.
//! - Hex digests are **lowercase**.

#![forbid(unsafe_code)]

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::IoResult;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over compact JSON bytes of any serializable value.
pub fn sha256_json<T: Serialize>(value: &T) -> IoResult<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(sha256_hex(&bytes))
}

/// `RUN:` + sha256 of the value's compact JSON bytes.
pub fn run_id_from_json<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(format!("RUN:{}", sha256_json(value)?))
}
