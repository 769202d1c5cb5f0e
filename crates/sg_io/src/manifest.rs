//! crates/sg_io/src/manifest.rs
//! Run manifest: a small JSON file naming the input table, group count and
//! output options so a run can be repeated without retyping flags.
//!
//! Policy:
//! - Unknown fields are rejected.
//! - Only `input_path` and `groups` are required.
//! - Paths are local only (no `scheme://`); relative paths resolve against the
//!   directory that holds the manifest file.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sg_core::{FieldMap, GroupCount, Strategy};
use tracing::debug;

use crate::{looks_like_url_strict, IoError, IoResult};

/// Manifests are tiny; anything bigger is a mistake.
const MAX_MANIFEST_BYTES: u64 = 1024 * 1024;

/// Manifest as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunManifest {
    pub input_path: String,
    pub groups: GroupCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategies: Option<Vec<Strategy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit_branch_files: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<FieldMap>,
}

/// Manifest with paths joined under the manifest directory and defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub input_path: PathBuf,
    pub groups: GroupCount,
    pub out_dir: Option<PathBuf>,
    pub strategies: Vec<Strategy>,
    pub emit_branch_files: bool,
    pub columns: FieldMap,
}

// ---------- loading ----------

/// Read and parse a manifest file. Shape checks only; see `resolve_paths`.
pub fn load_manifest(path: &Path) -> IoResult<RunManifest> {
    offline_check("manifest", &path.to_string_lossy())?;
    let meta = fs::metadata(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    if meta.len() > MAX_MANIFEST_BYTES {
        return Err(IoError::Limit(format!(
            "manifest {} is {} bytes (max {MAX_MANIFEST_BYTES})",
            path.display(),
            meta.len()
        )));
    }
    let bytes = fs::read(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let man: RunManifest = serde_json::from_slice(&bytes)
        .map_err(|e| IoError::Manifest(format!("{}: {e}", path.display())))?;
    validate_manifest(&man)?;
    debug!(path = %path.display(), groups = %man.groups, "manifest loaded");
    Ok(man)
}

/// Shape and offline policy. Does not touch the filesystem.
pub fn validate_manifest(man: &RunManifest) -> IoResult<()> {
    if man.input_path.trim().is_empty() {
        return Err(IoError::Manifest("input_path must not be empty".into()));
    }
    offline_check("input_path", &man.input_path)?;
    if let Some(out) = &man.out_dir {
        if out.trim().is_empty() {
            return Err(IoError::Manifest("out_dir must not be empty".into()));
        }
        offline_check("out_dir", out)?;
    }
    if let Some(s) = &man.strategies {
        if s.is_empty() {
            return Err(IoError::Manifest("strategies must list at least one strategy".into()));
        }
    }
    if let Some(cols) = &man.columns {
        cols.validate()
            .map_err(|e| IoError::Manifest(format!("columns: {e}")))?;
    }
    Ok(())
}

fn offline_check(label: &str, value: &str) -> IoResult<()> {
    if looks_like_url_strict(value) {
        return Err(IoError::Manifest(format!("{label} must be a local path: {value}")));
    }
    Ok(())
}

// ---------- resolution ----------

#[inline]
fn join_under(base: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Resolve paths against the directory of `manifest_path` and check that the
/// input table exists as a regular file.
pub fn resolve_paths(manifest_path: &Path, man: &RunManifest) -> IoResult<ResolvedManifest> {
    validate_manifest(man)?;
    let base = match manifest_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let input_path = join_under(base, &man.input_path);
    let md = fs::metadata(&input_path)
        .map_err(|e| IoError::Path(format!("input_path {}: {e}", input_path.display())))?;
    if !md.is_file() {
        return Err(IoError::Path(format!("input_path is not a file: {}", input_path.display())));
    }

    let mut strategies = man.strategies.clone().unwrap_or_else(|| Strategy::ALL.to_vec());
    strategies.sort();
    strategies.dedup();

    Ok(ResolvedManifest {
        input_path,
        groups: man.groups,
        out_dir: man.out_dir.as_deref().map(|s| join_under(base, s)),
        strategies,
        emit_branch_files: man.emit_branch_files.unwrap_or(true),
        columns: man.columns.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn minimal_manifest_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "students.csv", "Roll,Name,Email\n");
        let mp = write(dir.path(), "run.json", r#"{"input_path":"students.csv","groups":3}"#);

        let man = load_manifest(&mp).unwrap();
        let r = resolve_paths(&mp, &man).unwrap();
        assert_eq!(r.input_path, dir.path().join("students.csv"));
        assert_eq!(r.groups.get(), 3);
        assert_eq!(r.out_dir, None);
        assert_eq!(r.strategies, Strategy::ALL.to_vec());
        assert!(r.emit_branch_files);
        assert_eq!(r.columns, FieldMap::default());
    }

    #[test]
    fn full_manifest_round_trips_options() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "in.csv", "Id,Full,Mail\n");
        let mp = write(
            dir.path(),
            "run.json",
            r#"{
                "input_path": "in.csv",
                "groups": 4,
                "out_dir": "out",
                "strategies": ["size_balanced"],
                "emit_branch_files": false,
                "columns": {"id": "Id", "name": "Full", "contact": "Mail"}
            }"#,
        );
        let r = resolve_paths(&mp, &load_manifest(&mp).unwrap()).unwrap();
        assert_eq!(r.out_dir, Some(dir.path().join("out")));
        assert_eq!(r.strategies, vec![Strategy::SizeBalanced]);
        assert!(!r.emit_branch_files);
        assert_eq!(r.columns.id, "Id");
    }

    #[test]
    fn unknown_fields_and_bad_groups_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let extra = write(dir.path(), "a.json", r#"{"input_path":"x.csv","groups":3,"seed":1}"#);
        assert!(matches!(load_manifest(&extra), Err(IoError::Manifest(_))));

        let one = write(dir.path(), "b.json", r#"{"input_path":"x.csv","groups":1}"#);
        assert!(matches!(load_manifest(&one), Err(IoError::Manifest(_))));

        let huge = write(dir.path(), "d.json", r#"{"input_path":"x.csv","groups":4000000000}"#);
        assert!(matches!(load_manifest(&huge), Err(IoError::Manifest(_))));

        let missing = write(dir.path(), "c.json", r#"{"groups":3}"#);
        assert!(matches!(load_manifest(&missing), Err(IoError::Manifest(_))));
    }

    #[test]
    fn urls_and_missing_inputs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let url = write(dir.path(), "u.json", r#"{"input_path":"https://h/s.csv","groups":2}"#);
        assert!(matches!(load_manifest(&url), Err(IoError::Manifest(_))));

        let gone = write(dir.path(), "g.json", r#"{"input_path":"nope.csv","groups":2}"#);
        let man = load_manifest(&gone).unwrap();
        assert!(matches!(resolve_paths(&gone, &man), Err(IoError::Path(_))));
    }
}
