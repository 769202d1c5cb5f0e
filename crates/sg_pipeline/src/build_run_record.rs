//! BUILD_RUN_RECORD: the provenance document written next to the outputs.
//!
//! - `id` = `RUN:` + SHA-256 of the compact JSON of the record *without* its id.
//!   Field order is the struct declaration order, so equal runs get equal ids.
//! - File lists are relative to the output root, `/`-separated.
//! - No timestamps: re-running on the same input gives a byte-identical record.

use serde::{Deserialize, Serialize};
use sg_core::{FieldMap, GroupCount, Strategy};
use sg_io::hasher;

use crate::{allocate::AllocationRun, load::Roster, EngineMeta, PipelineError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub strategy: Strategy,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_size: Option<usize>,
    pub group_sizes: Vec<usize>,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecordDoc {
    pub id: String,
    pub engine: EngineMeta,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub input_sha256: Option<String>,
    pub columns: FieldMap,
    pub group_count: GroupCount,
    pub total_records: usize,
    pub categories: Vec<String>,
    pub runs: Vec<RunSummary>,
}

/// Same shape minus `id`; this is what the id hashes.
#[derive(Serialize)]
struct RunRecordNoId<'a> {
    engine: &'a EngineMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_sha256: Option<&'a str>,
    columns: &'a FieldMap,
    group_count: GroupCount,
    total_records: usize,
    categories: &'a [String],
    runs: &'a [RunSummary],
}

/// `files_per_run[i]` lists the files written for `runs[i]`.
pub fn build_run_record(
    engine: &EngineMeta,
    roster: &Roster,
    group_count: GroupCount,
    runs: &[AllocationRun],
    files_per_run: &[Vec<String>],
) -> Result<RunRecordDoc, PipelineError> {
    if runs.len() != files_per_run.len() {
        return Err(PipelineError::Emit(format!(
            "{} runs but {} file lists",
            runs.len(),
            files_per_run.len()
        )));
    }

    let summaries: Vec<RunSummary> = runs
        .iter()
        .zip(files_per_run)
        .map(|(r, files)| RunSummary {
            strategy: r.strategy,
            target_size: r.target_size,
            group_sizes: r.group_sizes(),
            files: files.clone(),
        })
        .collect();
    let categories: Vec<String> = roster.categories().iter().map(|c| c.as_str().to_string()).collect();

    let no_id = RunRecordNoId {
        engine,
        input_sha256: roster.input_sha256(),
        columns: roster.fields(),
        group_count,
        total_records: roster.len(),
        categories: &categories,
        runs: &summaries,
    };
    let id = hasher::run_id_from_json(&no_id)?;

    Ok(RunRecordDoc {
        id,
        engine: engine.clone(),
        input_sha256: roster.input_sha256().map(str::to_string),
        columns: roster.fields().clone(),
        group_count,
        total_records: roster.len(),
        categories,
        runs: summaries,
    })
}
