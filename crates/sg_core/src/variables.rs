//! variables.rs: Run domains: group count, allocation strategy, column mapping.

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

/// Smallest accepted number of groups.
pub const MIN_GROUPS: u32 = 2;

/// Largest accepted number of groups.
pub const MAX_GROUPS: u32 = 20;

/// Default number of groups when none is configured.
pub const DEFAULT_GROUPS: u32 = 5;

/// ------------ GroupCount ------------

/// Number of output groups; always within `MIN_GROUPS..=MAX_GROUPS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupCount(u32);

impl GroupCount {
    pub fn new(n: u32) -> Result<Self, CoreError> {
        if n < MIN_GROUPS {
            return Err(CoreError::InvalidGroupCount(alloc::format!(
                "{n} is below the minimum of {MIN_GROUPS}"
            )));
        }
        if n > MAX_GROUPS {
            return Err(CoreError::InvalidGroupCount(alloc::format!(
                "{n} is above the maximum of {MAX_GROUPS}"
            )));
        }
        Ok(GroupCount(n))
    }

    #[inline] pub fn get(self) -> u32 { self.0 }

    /// Same value as a `usize` index bound.
    #[inline] pub fn as_usize(self) -> usize { self.0 as usize }
}

impl Default for GroupCount {
    fn default() -> Self { GroupCount(DEFAULT_GROUPS) }
}

impl fmt::Display for GroupCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl FromStr for GroupCount {
    type Err = CoreError;
    /// Accepts a plain decimal integer only (`"5"`, not `"5.0"` or `"five"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidGroupCount(alloc::format!("{s:?} is not an integer")));
        }
        let n: u32 = t
            .parse()
            .map_err(|_| CoreError::InvalidGroupCount(alloc::format!("{s:?} is out of range")))?;
        GroupCount::new(n)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for GroupCount {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        use serde::de::{Error as DeError, Unexpected};
        let v = u64::deserialize(d)?;
        const EXPECTED: &str = "an integer from 2 to 20";
        let n = u32::try_from(v)
            .map_err(|_| D::Error::invalid_value(Unexpected::Unsigned(v), &EXPECTED))?;
        GroupCount::new(n).map_err(|_| D::Error::invalid_value(Unexpected::Unsigned(v), &EXPECTED))
    }
}

/// ------------ Strategy ------------

/// Allocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Cycle the group cursor across categories (branch-wise mix).
    #[cfg_attr(feature = "serde", serde(rename = "round_robin"))]
    RoundRobin,
    /// Fill each group to the target size, largest categories first (uniform mix).
    #[cfg_attr(feature = "serde", serde(rename = "size_balanced"))]
    SizeBalanced,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::RoundRobin, Strategy::SizeBalanced];

    /// Wire token (manifest / run record).
    pub fn token(self) -> &'static str {
        match self {
            Strategy::RoundRobin => "round_robin",
            Strategy::SizeBalanced => "size_balanced",
        }
    }

    /// Output directory for this strategy's group files.
    pub fn output_dir(self) -> &'static str {
        match self {
            Strategy::RoundRobin => "branchwise_groups",
            Strategy::SizeBalanced => "uniform_groups",
        }
    }

    /// File name of this strategy's statistics table.
    pub fn stats_file(self) -> &'static str {
        match self {
            Strategy::RoundRobin => "stats_branchwise.csv",
            Strategy::SizeBalanced => "stats_uniform.csv",
        }
    }

    /// Human title used in summaries.
    pub fn title(self) -> &'static str {
        match self {
            Strategy::RoundRobin => "Branch-wise groups",
            Strategy::SizeBalanced => "Uniform groups",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.token()) }
}

impl FromStr for Strategy {
    type Err = CoreError;
    /// Accepts `round_robin`/`round-robin`/`branchwise` and `size_balanced`/`size-balanced`/`uniform`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "round_robin" | "branchwise" => Ok(Strategy::RoundRobin),
            "size_balanced" | "uniform" => Ok(Strategy::SizeBalanced),
            _ => Err(CoreError::UnknownToken(s.to_owned())),
        }
    }
}

/// ------------ FieldMap ------------

/// Input column names for the identifier, name and contact fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct FieldMap {
    pub id: String,
    pub name: String,
    pub contact: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        FieldMap { id: "Roll".into(), name: "Name".into(), contact: "Email".into() }
    }
}

impl FieldMap {
    /// Output column order for member files: name, identifier, contact.
    pub fn output_header(&self) -> [&str; 3] {
        [self.name.as_str(), self.id.as_str(), self.contact.as_str()]
    }

    /// Reject empty column names.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.is_empty() || self.name.is_empty() || self.contact.is_empty() {
            return Err(CoreError::EmptyToken);
        }
        Ok(())
    }
}
