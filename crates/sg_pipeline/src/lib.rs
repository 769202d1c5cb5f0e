//! sg_pipeline: deterministic pipeline surface (load → normalize → index → allocate → stats → emit → run record).
//!
//! Algorithms live in `sg_algo`; files, digests and manifests in `sg_io`. This crate
//! wires them together around an immutable `Roster` so that each allocation call is
//! an independent computation over one loaded dataset.

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sg_core::{CoreError, FieldMap, GroupCount, Strategy};
use sg_io::IoError;
use thiserror::Error;
use tracing::{debug, info};

pub mod allocate;
pub mod build_run_record;
pub mod emit;
pub mod load;
pub mod normalize;

pub use allocate::{run_all, run_allocation, AllocationRun};
pub use build_run_record::{build_run_record, RunRecordDoc, RunSummary};
pub use load::{load_roster, roster_from_table, Roster};
pub use normalize::normalize;

/// File name of the run record under the output root.
pub const RUN_RECORD_FILE: &str = "run_record.json";

/// Engine identifiers echoed into the run record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMeta {
    pub name: String,
    pub version: String,
}

pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        name: "sg_engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Single error surface for the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A mapped column is absent from the input header row.
    #[error("missing required column: {0:?}")]
    MissingField(String),

    /// Identifier too short for the category window. `row` is the 1-based data row.
    #[error("row {row}: malformed identifier {id:?} (needs at least {} characters)", sg_core::CATEGORY_OFFSET + sg_core::CATEGORY_LEN)]
    MalformedIdentifier { row: usize, id: String },

    /// Category code that cannot name an output file (`/`, `:`, `*`, leading dot, …).
    #[error("row {row}: category code {code:?} cannot be used as a file name")]
    UnusableCategory { row: usize, code: String },

    /// Two category codes that differ only in letter case would share a file
    /// on case-insensitive file systems.
    #[error("row {row}: category code {code:?} differs only in case from {other:?} (row {first_row})")]
    CategoryCaseClash { row: usize, code: String, other: String, first_row: usize },

    #[error("invalid group count: {0}")]
    InvalidGroupCount(String),

    /// Run options that cannot be honored (empty column name, no strategy, …).
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("emit: {0}")]
    Emit(String),
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidGroupCount(m) => PipelineError::InvalidGroupCount(m),
            CoreError::MalformedIdentifier { id } => PipelineError::MalformedIdentifier { row: 0, id },
            CoreError::EmptyToken => PipelineError::Config("column names must not be empty".into()),
            CoreError::UnknownToken(t) => PipelineError::Config(format!("unknown token {t:?}")),
        }
    }
}

/// Options for one end-to-end run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub groups: GroupCount,
    pub strategies: Vec<Strategy>,
    pub out_dir: PathBuf,
    pub emit_branch_files: bool,
    pub columns: FieldMap,
}

impl RunConfig {
    /// Both strategies, branch files on, default columns.
    pub fn new(groups: GroupCount, out_dir: impl Into<PathBuf>) -> Self {
        RunConfig {
            groups,
            strategies: Strategy::ALL.to_vec(),
            out_dir: out_dir.into(),
            emit_branch_files: true,
            columns: FieldMap::default(),
        }
    }
}

/// Everything a run produced, in emission order.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub runs: Vec<AllocationRun>,
    pub run_record: RunRecordDoc,
    pub written: Vec<PathBuf>,
}

/// Load `input` with `cfg.columns`, then allocate and emit.
pub fn run(input: &Path, cfg: &RunConfig) -> Result<PipelineOutputs, PipelineError> {
    let roster = load_roster(input, &cfg.columns)?;
    run_with_roster(&roster, cfg)
}

/// Allocate and emit over an already-loaded roster. The roster's own field map
/// names the output columns.
pub fn run_with_roster(roster: &Roster, cfg: &RunConfig) -> Result<PipelineOutputs, PipelineError> {
    if cfg.strategies.is_empty() {
        return Err(PipelineError::Config("no allocation strategy selected".into()));
    }

    let runs = run_all(roster, &cfg.strategies, cfg.groups);
    let mut written = Vec::new();

    if cfg.emit_branch_files {
        written.extend(emit::emit_branch_files(&cfg.out_dir, roster)?);
    }

    let mut files_per_run = Vec::with_capacity(runs.len());
    for r in &runs {
        let files = emit::emit_run(&cfg.out_dir, roster.fields(), r)?;
        files_per_run.push(files.iter().map(|p| relative_name(&cfg.out_dir, p)).collect::<Vec<_>>());
        written.extend(files);
    }

    let run_record = build_run_record(&engine_identifiers(), roster, cfg.groups, &runs, &files_per_run)?;
    let rr_path = cfg.out_dir.join(RUN_RECORD_FILE);
    sg_io::writer::write_json_pretty(&rr_path, &run_record)?;
    debug!(id = %run_record.id, "run record written");
    written.push(rr_path);

    info!(out = %cfg.out_dir.display(), files = written.len(), "run complete");
    Ok(PipelineOutputs { runs, run_record, written })
}

/// `p` relative to `root`, `/`-separated for stable records across platforms.
pub(crate) fn relative_name(root: &Path, p: &Path) -> String {
    let rel = p.strip_prefix(root).unwrap_or(p);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
