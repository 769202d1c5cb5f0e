//! crates/sg_io/src/lib.rs
//! Single-source-of-truth I/O crate for the SG engine.
//!
//! - CSV input tables (`loader`), run manifests (`manifest`), atomic writers
//!   (`writer`) and SHA-256 digests (`hasher`) live in file modules.
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - No allocation logic here; callers hand in already-computed tables.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for sg_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// CSV read/write errors (ragged rows, invalid UTF-8, …).
    #[error("csv error: {0}")]
    Csv(String),

    /// JSON serialization/deserialization errors.
    #[error("json error: {0}")]
    Json(String),

    /// Manifest shape or policy violations (URLs, empty paths, …).
    #[error("manifest: {0}")]
    Manifest(String),

    /// Input exceeds a configured size limit.
    #[error("limit exceeded: {0}")]
    Limit(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json(e.to_string())
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        match e.kind() {
            csv::ErrorKind::Io(_) => IoError::Path(e.to_string()),
            _ => IoError::Csv(e.to_string()),
        }
    }
}

/* ---------------- Public modules ---------------- */

pub mod hasher;
pub mod loader;
pub mod manifest;
pub mod writer;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}
