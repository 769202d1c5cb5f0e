//! EMIT stage: flat CSV files under an output root.
//!
//! ```text
//! <out>/branch_files/<CODE>.csv
//! <out>/<strategy dir>/G<n>.csv          non-empty groups only
//! <out>/<strategy dir>/<stats file>
//! ```
//!
//! Member files are headed by the roster's column names in the order name,
//! identifier, contact. All writes go through `sg_io::writer` (atomic).
//!
//! Each directory is cleared of a previous run's outputs before writing, so a
//! rerun with fewer groups or categories leaves no stale files behind.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use sg_algo::StatsTable;
use sg_core::{CategoryCode, FieldMap, Record};
use sg_io::writer::{remove_stale_files, write_csv};
use tracing::info;

use crate::{allocate::AllocationRun, load::Roster, PipelineError};

/// Directory holding one member file per category.
pub const BRANCH_DIR: &str = "branch_files";

fn member_row(r: &Record) -> [&str; 3] {
    [r.name.as_str(), r.id.as_str(), r.contact.as_str()]
}

fn write_members(path: &Path, fields: &FieldMap, members: &[Record]) -> Result<(), PipelineError> {
    write_csv(path, &fields.output_header(), members.iter().map(member_row))?;
    Ok(())
}

/// Normalized rosters only carry safe codes; rosters built from raw records are checked here.
fn file_stem_for(code: &CategoryCode) -> Result<&str, PipelineError> {
    if !code.is_file_safe() {
        return Err(PipelineError::Emit(format!(
            "category code {:?} cannot be used as a file name",
            code.as_str()
        )));
    }
    Ok(code.as_str())
}

/// `G<n>.csv`
fn is_group_file(name: &str) -> bool {
    name.strip_prefix('G')
        .and_then(|rest| rest.strip_suffix(".csv"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// One file per category, members in index order (name ascending).
pub fn emit_branch_files(out_dir: &Path, roster: &Roster) -> Result<Vec<PathBuf>, PipelineError> {
    let dir = out_dir.join(BRANCH_DIR);
    for (code, _) in roster.index().iter() {
        file_stem_for(code)?;
    }
    remove_stale_files(&dir, |name| name.ends_with(".csv") && !name.starts_with('.'))?;
    let mut written = Vec::with_capacity(roster.index().category_count());
    for (code, members) in roster.index().iter() {
        let path = dir.join(format!("{}.csv", file_stem_for(code)?));
        write_members(&path, roster.fields(), members)?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "branch files written");
    Ok(written)
}

/// Group files (non-empty groups) followed by the statistics file.
pub fn emit_run(out_dir: &Path, fields: &FieldMap, run: &AllocationRun) -> Result<Vec<PathBuf>, PipelineError> {
    let dir = out_dir.join(run.strategy.output_dir());
    let stats_file = run.strategy.stats_file();
    remove_stale_files(&dir, |name| is_group_file(name) || name == stats_file)?;
    let mut written = Vec::new();
    for g in run.non_empty() {
        let path = dir.join(format!("{}.csv", g.label()));
        write_members(&path, fields, &g.members)?;
        written.push(path);
    }
    let stats_path = dir.join(stats_file);
    write_stats(&stats_path, &run.stats)?;
    written.push(stats_path);
    info!(strategy = %run.strategy, dir = %dir.display(), files = written.len(), "group files written");
    Ok(written)
}

/// `Group, <codes…>, Total` then one row per non-empty group.
pub fn write_stats(path: &Path, stats: &StatsTable) -> Result<(), PipelineError> {
    write_csv(path, &stats.header(), stats.rows.iter().map(StatsTable::row_cells))?;
    Ok(())
}
