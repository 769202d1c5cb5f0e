//! NORMALIZE stage: `RawTable` rows → typed `Record`s.
//!
//! - Every mapped column must be present in the header row; this is checked
//!   before any row is read, so a schema error never yields partial output.
//! - The category is derived from the identifier window (`sg_core::ids`).
//!   A short identifier fails the whole load with its 1-based row number.
//! - Cell text is taken as-is; extra columns are ignored.
//! - Category codes must be usable as file names, and no two codes may differ
//!   only in letter case. Both are checked here so that bad input fails the
//!   load instead of a later emit.
//! - Duplicate identifiers are kept and reported with `warn!`.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use sg_core::{CategoryCode, FieldMap, Record, StudentId};
use sg_io::loader::RawTable;
use tracing::{debug, warn};

use crate::PipelineError;

/// Header positions of the three mapped columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    id: usize,
    name: usize,
    contact: usize,
}

fn resolve_columns(table: &RawTable, fields: &FieldMap) -> Result<Columns, PipelineError> {
    fields.validate()?;
    let find = |col: &str| {
        table
            .column_index(col)
            .ok_or_else(|| PipelineError::MissingField(col.to_string()))
    };
    Ok(Columns { id: find(&fields.id)?, name: find(&fields.name)?, contact: find(&fields.contact)? })
}

#[inline]
fn cell(row: &[String], i: usize) -> &str {
    row.get(i).map(String::as_str).unwrap_or("")
}

/// First row seen for each case-folded category code.
#[derive(Default)]
struct CategoryGuard {
    seen: BTreeMap<String, (CategoryCode, usize)>,
}

impl CategoryGuard {
    fn check(&mut self, code: &CategoryCode, row: usize) -> Result<(), PipelineError> {
        if !code.is_file_safe() {
            return Err(PipelineError::UnusableCategory { row, code: code.to_string() });
        }
        match self.seen.get(&code.folded()) {
            Some((other, first_row)) if other != code => Err(PipelineError::CategoryCaseClash {
                row,
                code: code.to_string(),
                other: other.to_string(),
                first_row: *first_row,
            }),
            Some(_) => Ok(()),
            None => {
                self.seen.insert(code.folded(), (code.clone(), row));
                Ok(())
            }
        }
    }
}

/// Build records in input order.
pub fn normalize(table: &RawTable, fields: &FieldMap) -> Result<Vec<Record>, PipelineError> {
    let cols = resolve_columns(table, fields)?;

    let mut out = Vec::with_capacity(table.len());
    let mut first_seen: BTreeMap<&str, usize> = BTreeMap::new();
    let mut categories = CategoryGuard::default();

    for (i, row) in table.rows.iter().enumerate() {
        let row_no = i + 1;
        let id = cell(row, cols.id);
        let rec = Record::new(StudentId::new(id), cell(row, cols.name), cell(row, cols.contact))
            .map_err(|_| PipelineError::MalformedIdentifier { row: row_no, id: id.to_string() })?;
        categories.check(&rec.category, row_no)?;

        if let Some(&prev) = first_seen.get(id) {
            warn!(id, row = row_no, first_row = prev, "duplicate identifier");
        } else {
            first_seen.insert(id, row_no);
        }
        out.push(rec);
    }

    debug!(records = out.len(), distinct_ids = first_seen.len(), "normalized");
    Ok(out)
}
