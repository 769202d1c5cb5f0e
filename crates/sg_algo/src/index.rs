//! Category index: records grouped by category code, each category sorted by name.
//!
//! Contract:
//! - Codes iterate in ascending order (`BTreeMap`).
//! - Within a category records are sorted by `name` ascending with a stable
//!   sort, so equal names keep their input order.
//! - Every input record lands in exactly one category; empty input yields an
//!   empty index.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use sg_core::determinism::{cmp_size_desc_then_code, sort_records_by_name};
use sg_core::{CategoryCode, Record};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    by_code: BTreeMap<CategoryCode, Vec<Record>>,
    total: usize,
}

/// Build the index from normalized records (input order matters only for name ties).
pub fn build_category_index<I>(records: I) -> CategoryIndex
where
    I: IntoIterator<Item = Record>,
{
    let mut by_code: BTreeMap<CategoryCode, Vec<Record>> = BTreeMap::new();
    let mut total = 0usize;
    for r in records {
        total += 1;
        by_code.entry(r.category.clone()).or_default().push(r);
    }
    for members in by_code.values_mut() {
        sort_records_by_name(members);
    }
    CategoryIndex { by_code, total }
}

impl CategoryIndex {
    /// Total number of records across all categories.
    #[inline]
    pub fn len(&self) -> usize { self.total }

    #[inline]
    pub fn is_empty(&self) -> bool { self.total == 0 }

    /// Number of distinct categories.
    #[inline]
    pub fn category_count(&self) -> usize { self.by_code.len() }

    /// Category codes, ascending.
    pub fn categories(&self) -> Vec<CategoryCode> {
        self.by_code.keys().cloned().collect()
    }

    pub fn get(&self, code: &CategoryCode) -> Option<&[Record]> {
        self.by_code.get(code).map(Vec::as_slice)
    }

    /// `(code, records)` in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryCode, &[Record])> {
        self.by_code.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// `(code, records)` largest category first; equal sizes by code ascending.
    pub fn by_size_desc(&self) -> Vec<(&CategoryCode, &[Record])> {
        let mut v: Vec<(&CategoryCode, &[Record])> = self.iter().collect();
        v.sort_by(|a, b| cmp_size_desc_then_code((a.0, a.1.len()), (b.0, b.1.len())));
        v
    }

    /// Per-category record counts, ascending by code.
    pub fn counts(&self) -> BTreeMap<CategoryCode, usize> {
        self.by_code.iter().map(|(k, v)| (k.clone(), v.len())).collect()
    }
}
