//! crates/sg_core/src/entities.rs
//! Normalized student records and allocation groups.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{CategoryCode, StudentId};

/// One normalized student. Immutable once built; `category` is derived from `id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    pub id: StudentId,
    pub name: String,
    pub contact: String,
    pub category: CategoryCode,
}

impl Record {
    /// Build a record, deriving its category from the identifier window.
    pub fn new(
        id: StudentId,
        name: impl Into<String>,
        contact: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let category = id.category_code()?;
        Ok(Record { id, name: name.into(), contact: contact.into(), category })
    }
}

/// One output partition of an allocation run. `index` is 0-based.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub index: usize,
    pub members: Vec<Record>,
}

impl Group {
    pub fn new(index: usize) -> Self {
        Group { index, members: Vec::new() }
    }

    /// Display label, 1-based: `G1`, `G2`, …
    pub fn label(&self) -> String {
        group_label(self.index)
    }

    #[inline]
    pub fn len(&self) -> usize { self.members.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.members.is_empty() }
}

/// Label for a 0-based group index.
#[inline]
pub fn group_label(index: usize) -> String {
    format!("G{}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, name: &str) -> Record {
        Record::new(StudentId::from(id), name, "x@example.org").unwrap()
    }

    #[test]
    fn record_derives_category() {
        let r = rec("1401AI01", "Asha");
        assert_eq!(r.category.as_str(), "AI");
        assert_eq!(r.contact, "x@example.org");
    }

    #[test]
    fn record_rejects_short_id() {
        assert!(Record::new(StudentId::from("14A"), "n", "c").is_err());
    }

    #[test]
    fn group_labels_are_one_based() {
        assert_eq!(Group::new(0).label(), "G1");
        assert_eq!(group_label(9), "G10");
    }

    #[test]
    fn group_collects_members() {
        let mut g = Group::new(0);
        assert!(g.is_empty());
        g.members.push(rec("1401AI01", "a"));
        g.members.push(rec("1401CB01", "b"));
        assert_eq!(g.len(), 2);
        assert_eq!(g.label(), "G1");
    }
}
