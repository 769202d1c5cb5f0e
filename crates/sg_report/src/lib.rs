//! sg_report/src/lib.rs: Pure offline report model + renderers (text, JSON).
//!
//! Rules:
//! - No I/O here. Callers hand in the loaded roster and the allocation runs.
//! - Nothing is recomputed: sizes and per-category counts come from the runs'
//!   statistics tables.
//! - Stable section order and field names.

#![deny(unsafe_code)]

use sg_core::determinism::cmp_size_desc_then_code;
use sg_core::CategoryCode;
use sg_pipeline::{AllocationRun, Roster, RunRecordDoc};

pub mod render_text;
#[cfg(feature = "render_json")]
pub mod render_json;

pub use render_text::render_text;
#[cfg(feature = "render_json")]
pub use render_json::render_json;

// ===== Errors =====
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// A run disagrees with the roster it claims to cover.
    Inconsistent(String),
    /// Serialization failed (JSON renderer).
    Render(String),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Inconsistent(m) => write!(f, "inconsistent report input: {m}"),
            ReportError::Render(m) => write!(f, "render error: {m}"),
        }
    }
}
impl std::error::Error for ReportError {}

// ===== Model =====
#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportModel {
    pub dataset: SectionDataset,
    pub runs: Vec<SectionRun>,
    #[cfg_attr(feature = "render_json", serde(skip_serializing_if = "Option::is_none"))]
    pub integrity: Option<SectionIntegrity>,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryCount {
    pub code: String,
    pub count: usize,
}

/// Dataset summary: totals plus per-category counts (codes ascending).
#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionDataset {
    pub total_students: usize,
    pub total_categories: usize,
    pub categories: Vec<CategoryCount>,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionRun {
    pub strategy: String,
    pub title: String,
    pub group_count: u32,
    #[cfg_attr(feature = "render_json", serde(skip_serializing_if = "Option::is_none"))]
    pub target_size: Option<usize>,
    /// Non-empty groups only.
    pub groups: Vec<GroupLine>,
    pub empty_groups: usize,
}

/// One `G<n>` line: size and the categories present, largest first.
#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupLine {
    pub label: String,
    pub size: usize,
    pub distribution: Vec<CategoryCount>,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionIntegrity {
    pub run_id: String,
    #[cfg_attr(feature = "render_json", serde(skip_serializing_if = "Option::is_none"))]
    pub input_sha256: Option<String>,
    pub engine_name: String,
    pub engine_version: String,
}

// ===== Builders =====

/// Build the model. `record` adds the integrity footer when a run was emitted.
pub fn build_model(
    roster: &Roster,
    runs: &[AllocationRun],
    record: Option<&RunRecordDoc>,
) -> Result<ReportModel, ReportError> {
    let dataset = map_dataset(roster);
    let runs = runs
        .iter()
        .map(|r| map_run(roster, r))
        .collect::<Result<Vec<_>, _>>()?;
    let integrity = record.map(|rec| SectionIntegrity {
        run_id: rec.id.clone(),
        input_sha256: rec.input_sha256.clone(),
        engine_name: rec.engine.name.clone(),
        engine_version: rec.engine.version.clone(),
    });
    Ok(ReportModel { dataset, runs, integrity })
}

fn map_dataset(roster: &Roster) -> SectionDataset {
    let categories: Vec<CategoryCount> = roster
        .category_counts()
        .into_iter()
        .map(|(code, count)| CategoryCount { code: code.as_str().to_string(), count })
        .collect();
    SectionDataset {
        total_students: roster.len(),
        total_categories: categories.len(),
        categories,
    }
}

fn map_run(roster: &Roster, run: &AllocationRun) -> Result<SectionRun, ReportError> {
    let stats = &run.stats;
    if stats.grand_total() != roster.len() {
        return Err(ReportError::Inconsistent(format!(
            "{} run covers {} of {} students",
            run.strategy,
            stats.grand_total(),
            roster.len()
        )));
    }

    let groups = stats
        .rows
        .iter()
        .map(|row| {
            let mut present: Vec<(&CategoryCode, usize)> = stats
                .categories
                .iter()
                .zip(row.counts.iter().copied())
                .filter(|(_, n)| *n > 0)
                .collect();
            present.sort_by(|a, b| cmp_size_desc_then_code(*a, *b));
            GroupLine {
                label: row.label.clone(),
                size: row.total,
                distribution: present
                    .into_iter()
                    .map(|(c, n)| CategoryCount { code: c.as_str().to_string(), count: n })
                    .collect(),
            }
        })
        .collect::<Vec<_>>();

    Ok(SectionRun {
        strategy: run.strategy.token().to_string(),
        title: run.strategy.title().to_string(),
        group_count: run.group_count.get(),
        target_size: run.target_size,
        empty_groups: run.groups.len() - groups.len(),
        groups,
    })
}
