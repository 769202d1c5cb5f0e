//! sg_core: Core types, domains, ordering helpers for the student grouping engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`sg_io`, `sg_algo`, `sg_pipeline`, `sg_report`, `sg_cli`).
//!
//! - Identifier tokens: `StudentId`, `CategoryCode`
//! - Category derivation window (`CATEGORY_OFFSET`, `CATEGORY_LEN`)
//! - Entities: `Record`, `Group`
//! - Domains: `GroupCount`, `Strategy`, `FieldMap`
//! - Deterministic ordering helpers
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod errors {
    use alloc::string::String;
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        /// Group count outside 2..=20, or not an integer.
        InvalidGroupCount(String),
        /// Identifier too short to contain the category window.
        MalformedIdentifier { id: String },
        /// Token must not be empty (category codes, column names).
        EmptyToken,
        /// Unknown wire token for an enum domain.
        UnknownToken(String),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidGroupCount(why) => write!(f, "invalid group count: {why}"),
                CoreError::MalformedIdentifier { id } => write!(
                    f,
                    "malformed identifier {id:?}: needs at least {} characters",
                    crate::ids::CATEGORY_OFFSET + crate::ids::CATEGORY_LEN
                ),
                CoreError::EmptyToken => write!(f, "empty token"),
                CoreError::UnknownToken(t) => write!(f, "unknown token: {t}"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod ids;
pub mod entities;
pub mod determinism;
pub mod variables;

pub use errors::CoreError;
pub use ids::{CategoryCode, StudentId, CATEGORY_LEN, CATEGORY_OFFSET};
pub use entities::{Group, Record};
pub use variables::{FieldMap, GroupCount, Strategy, DEFAULT_GROUPS, MAX_GROUPS, MIN_GROUPS};
