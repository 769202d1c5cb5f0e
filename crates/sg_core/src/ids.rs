//! crates/sg_core/src/ids.rs
//! Identifier newtypes and the category-derivation rule.
//! Deterministic, no I/O.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Zero-based character offset of the category code inside an identifier.
///
/// Enrollment identifiers follow `YYXXCCNN` (e.g. `1401AI01`): characters
/// 5–6 (1-indexed) carry the branch code.
pub const CATEGORY_OFFSET: usize = 4;

/// Length of the category code, in characters.
pub const CATEGORY_LEN: usize = 2;

macro_rules! simple_string_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }
    }
}

simple_string_newtype!(
    /// Student identifier (roll number). Opaque apart from the category window.
    StudentId
);
simple_string_newtype!(
    /// Category (branch) code derived from a `StudentId`. Never empty.
    CategoryCode
);

impl StudentId {
    /// Identifiers are taken verbatim; shape is only checked when deriving the category.
    pub fn new(s: impl Into<String>) -> Self {
        StudentId(s.into())
    }

    /// Characters `CATEGORY_OFFSET..CATEGORY_OFFSET + CATEGORY_LEN` of the identifier.
    pub fn category_code(&self) -> Result<CategoryCode, CoreError> {
        let code: String = self
            .0
            .chars()
            .skip(CATEGORY_OFFSET)
            .take(CATEGORY_LEN)
            .collect();
        if code.chars().count() < CATEGORY_LEN {
            return Err(CoreError::MalformedIdentifier { id: self.0.clone() });
        }
        Ok(CategoryCode(code))
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self { StudentId(s.to_owned()) }
}

impl FromStr for CategoryCode {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() { return Err(CoreError::EmptyToken); }
        Ok(CategoryCode(s.to_owned()))
    }
}

impl CategoryCode {
    /// Codes name output files (`<CODE>.csv`). A safe code has no path
    /// separators, no characters Windows rejects, no control characters, and
    /// does not start with or end in a dot.
    pub fn is_file_safe(&self) -> bool {
        let s = self.0.as_str();
        !(s.starts_with('.')
            || s.ends_with('.')
            || s.ends_with(' ')
            || s.chars().any(|c| {
                c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            }))
    }

    /// Key under which two codes would name the same file on a case-insensitive file system.
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }
}

impl TryFrom<&str> for CategoryCode {
    type Error = CoreError;
    #[inline]
    fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
}
