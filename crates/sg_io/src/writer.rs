//! Output writers (sg_io)
//! - CSV: header row then data rows, `\n` terminated, minimal quoting
//! - JSON: pretty, trailing newline
//! - Atomic write: temp file in same dir + fsync(temp) + rename; fsync(dir) on Unix
//! - Fallback: if rename fails (e.g., cross-device), write directly to target,
//!   fsync(target), then remove temp.
//! - A temp file whose write or fsync fails is removed before the error returns.
//! - `remove_stale_files` clears a previous run's outputs from a directory.

#![allow(clippy::needless_borrow)]

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace};

use crate::IoResult;

/// Encode a table as CSV bytes.
pub fn csv_bytes<H, R, C>(header: &[H], rows: R) -> IoResult<Vec<u8>>
where
    H: AsRef<str>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<[u8]>,
{
    let mut w = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    w.write_record(header.iter().map(|h| h.as_ref()))?;
    for row in rows {
        w.write_record(row)?;
    }
    w.into_inner()
        .map_err(|e| crate::IoError::Csv(e.to_string()))
}

/// Write a CSV table atomically.
pub fn write_csv<H, R, C>(path: &Path, header: &[H], rows: R) -> IoResult<()>
where
    H: AsRef<str>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<[u8]>,
{
    let bytes = csv_bytes(header, rows)?;
    write_atomic(path, &bytes)?;
    Ok(())
}

/// Write `value` as pretty JSON (with trailing newline) atomically.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> IoResult<()> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)?;
    Ok(())
}

/// Write bytes to `path` atomically (with safe cross-device fallback).
/// Parent directories are created on demand.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let tmp = make_unique_tmp_path(path);
    write_temp(&tmp, |f| f.write_all(bytes))?;

    match fs::rename(&tmp, path) {
        Ok(()) => {
            let _ = fsync_dir(parent);
            trace!(path = %path.display(), bytes = bytes.len(), "atomic write");
            Ok(())
        }
        Err(_e) => {
            let res: io::Result<()> = (|| {
                let mut f = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?;
                f.write_all(bytes)?;
                f.sync_all()?;
                Ok(())
            })();
            let _ = fs::remove_file(&tmp);
            res?;
            let _ = fsync_dir(parent);
            Ok(())
        }
    }
}

/// Create `tmp`, fill it and fsync it. On any failure the temp file is removed.
fn write_temp<F>(tmp: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut fs::File) -> io::Result<()>,
{
    let mut tf = OpenOptions::new()
        .write(true)
        .create_new(true) // avoid clobbering another writer's temp
        .open(tmp)?;
    let res = fill(&mut tf).and_then(|()| tf.sync_all());
    drop(tf);
    if res.is_err() {
        let _ = fs::remove_file(tmp);
    }
    res
}

/// Remove the regular files directly under `dir` whose names match `stale`.
/// A missing directory counts as empty. Returns how many files were removed.
pub fn remove_stale_files<F>(dir: &Path, stale: F) -> IoResult<usize>
where
    F: Fn(&str) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(it) => it,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(crate::IoError::Path(format!("{}: {e}", dir.display()))),
    };
    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_some_and(|n| stale(n)) {
            fs::remove_file(entry.path())
                .map_err(|e| crate::IoError::Path(format!("{}: {e}", entry.path().display())))?;
            removed += 1;
        }
    }
    if removed > 0 {
        debug!(dir = %dir.display(), removed, "stale outputs removed");
    }
    Ok(removed)
}

/// Create a unique temp path next to `target`: "<filename>.<pid>.<counter>.tmp"
fn make_unique_tmp_path(target: &Path) -> PathBuf {
    use std::ffi::OsString;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let fname = target
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let tmp_name: OsString = OsString::from(format!(".{fname}.{pid}.{n}.tmp"));

    match target.parent() {
        Some(dir) => dir.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> io::Result<()> {
    let df = OpenOptions::new().read(true).open(dir)?;
    df.sync_all()
}

#[cfg(not(unix))]
#[inline]
fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_quotes_only_when_needed() {
        let rows = vec![
            vec!["Asha", "1401AI01", "a@x.in"],
            vec!["Rao, K", "1401CB02", "k@x.in"],
        ];
        let bytes = csv_bytes(&["Name", "Roll", "Email"], rows).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Name,Roll,Email\nAsha,1401AI01,a@x.in\n\"Rao, K\",1401CB02,k@x.in\n"
        );
    }

    #[test]
    fn header_only_table() {
        let rows: Vec<Vec<String>> = Vec::new();
        let bytes = csv_bytes(&["Group", "Total"], rows).unwrap();
        assert_eq!(bytes, b"Group,Total\n");
    }

    #[test]
    fn atomic_write_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/out.csv");
        write_atomic(&target, b"x\n").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"x\n");
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_temp_write_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = make_unique_tmp_path(&dir.path().join("out.csv"));
        let err = write_temp(&tmp, |f| {
            f.write_all(b"partial")?;
            Err(io::Error::other("no space left on device"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "no space left on device");
        assert!(!tmp.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn stale_files_are_removed_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for n in ["G1.csv", "G7.csv", "notes.txt"] {
            fs::write(dir.path().join(n), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("G9.csv")).unwrap();
        let n = remove_stale_files(dir.path(), |name| name.starts_with('G')).unwrap();
        assert_eq!(n, 2);
        assert!(!dir.path().join("G1.csv").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("G9.csv").is_dir());
        assert_eq!(remove_stale_files(&dir.path().join("absent"), |_| true).unwrap(), 0);
    }

    #[test]
    fn json_pretty_has_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("r.json");
        write_json_pretty(&p, &serde_json::json!({"a": 1})).unwrap();
        let s = fs::read_to_string(&p).unwrap();
        assert!(s.ends_with("}\n"));
        assert!(s.contains("\"a\": 1"));
    }
}
