//! Plain-text summary renderer.
//!
//! ```text
//! Total students: 8
//! Total categories: 2
//!   AI: 5 students
//!   CB: 3 students
//!
//! Branch-wise groups (round_robin, 2 groups)
//!   G1: 4 students - AI: 3, CB: 1
//! ```

use std::fmt::Write;

use crate::{CategoryCount, ReportModel, SectionRun};

fn plural(n: usize) -> &'static str {
    if n == 1 { "student" } else { "students" }
}

fn join_counts(xs: &[CategoryCount]) -> String {
    xs.iter()
        .map(|c| format!("{}: {}", c.code, c.count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_run(out: &mut String, run: &SectionRun) -> std::fmt::Result {
    write!(out, "{} ({}, {} groups", run.title, run.strategy, run.group_count)?;
    if let Some(t) = run.target_size {
        write!(out, ", target {t}")?;
    }
    writeln!(out, ")")?;
    for g in &run.groups {
        writeln!(out, "  {}: {} {} - {}", g.label, g.size, plural(g.size), join_counts(&g.distribution))?;
    }
    if run.empty_groups > 0 {
        writeln!(out, "  ({} empty groups not written)", run.empty_groups)?;
    }
    Ok(())
}

fn render_into(out: &mut String, m: &ReportModel) -> std::fmt::Result {
    writeln!(out, "Total students: {}", m.dataset.total_students)?;
    writeln!(out, "Total categories: {}", m.dataset.total_categories)?;
    for c in &m.dataset.categories {
        writeln!(out, "  {}: {} {}", c.code, c.count, plural(c.count))?;
    }
    for run in &m.runs {
        writeln!(out)?;
        write_run(out, run)?;
    }
    if let Some(i) = &m.integrity {
        writeln!(out)?;
        writeln!(out, "Run ID: {}", i.run_id)?;
        if let Some(sha) = &i.input_sha256 {
            writeln!(out, "Input sha256: {sha}")?;
        }
        writeln!(out, "Engine: {} {}", i.engine_name, i.engine_version)?;
    }
    Ok(())
}

/// Render the whole model as a human summary (trailing newline included).
pub fn render_text(m: &ReportModel) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_into(&mut out, m);
    out
}
