//! LOAD stage: CSV path → `RawTable` → records → `Roster`.
//!
//! A `Roster` is the loaded-dataset handle. It is built once per input and never
//! mutated; allocation calls borrow it, so independent runs over the same roster
//! can proceed on separate threads without locking.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use sg_algo::{build_category_index, CategoryIndex};
use sg_core::{CategoryCode, FieldMap, Record};
use sg_io::{loader, loader::RawTable};
use tracing::debug;

use crate::{normalize::normalize, PipelineError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    records: Vec<Record>,
    index: CategoryIndex,
    fields: FieldMap,
    input_sha256: Option<String>,
}

impl Roster {
    /// Build from already-normalized records (input order preserved).
    pub fn from_records(records: Vec<Record>, fields: FieldMap) -> Self {
        let index = build_category_index(records.iter().cloned());
        Roster { records, index, fields, input_sha256: None }
    }

    /// Records in input order.
    pub fn records(&self) -> &[Record] { &self.records }

    pub fn index(&self) -> &CategoryIndex { &self.index }

    /// Column names used to read the input (and to head output files).
    pub fn fields(&self) -> &FieldMap { &self.fields }

    /// SHA-256 of the source file, when loaded from disk.
    pub fn input_sha256(&self) -> Option<&str> { self.input_sha256.as_deref() }

    #[inline]
    pub fn len(&self) -> usize { self.records.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Sorted category codes.
    pub fn categories(&self) -> Vec<CategoryCode> { self.index.categories() }

    /// Records per category, codes ascending.
    pub fn category_counts(&self) -> BTreeMap<CategoryCode, usize> { self.index.counts() }
}

/// Normalize an in-memory table.
pub fn roster_from_table(table: &RawTable, fields: &FieldMap) -> Result<Roster, PipelineError> {
    let records = normalize(table, fields)?;
    Ok(Roster::from_records(records, fields.clone()))
}

/// Read, hash and normalize a local CSV file. The digest covers the bytes parsed.
pub fn load_roster(path: &Path, fields: &FieldMap) -> Result<Roster, PipelineError> {
    let input = loader::read_input(path)?;
    let mut roster = roster_from_table(&input.table, fields)?;
    roster.input_sha256 = Some(input.sha256);
    debug!(
        path = %path.display(),
        records = roster.len(),
        categories = roster.index.category_count(),
        "roster loaded"
    );
    Ok(roster)
}
