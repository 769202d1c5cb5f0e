//! Loader: read a local CSV student table into an untyped `RawTable`.
//! Header row required; every data row must match the header arity.
//! Typing and field validation happen downstream (pipeline normalizer).
//! A file is read once; the table and its digest come from the same bytes.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::{hasher::sha256_hex, looks_like_url_strict, IoError, IoResult};

/// Inputs larger than this are rejected before parsing.
pub const MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

/// Header + string rows exactly as read (no trimming, no typing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of `name` in the header row (exact, case-sensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    #[inline]
    pub fn len(&self) -> usize { self.rows.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// A parsed input table and the SHA-256 of the bytes it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedInput {
    pub table: RawTable,
    pub sha256: String,
}

/// Read a CSV file from a local path (size-limited), hashing the same bytes.
pub fn read_input(path: &Path) -> IoResult<LoadedInput> {
    let bytes = read_input_bytes(path)?;
    let table = read_csv_reader(bytes.as_slice())?;
    debug!(path = %path.display(), rows = table.len(), columns = table.headers.len(), "csv loaded");
    Ok(LoadedInput { table, sha256: sha256_hex(&bytes) })
}

fn read_input_bytes(path: &Path) -> IoResult<Vec<u8>> {
    if let Some(s) = path.to_str() {
        if looks_like_url_strict(s) {
            return Err(IoError::Path(format!("input must be a local file: {s}")));
        }
    }
    let too_big = |len: u64| {
        IoError::Limit(format!("{} is {len} bytes (max {MAX_INPUT_BYTES})", path.display()))
    };
    let meta = std::fs::metadata(path)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    if meta.len() > MAX_INPUT_BYTES {
        return Err(too_big(meta.len()));
    }
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    // The file may grow after the metadata check.
    let mut bytes = Vec::with_capacity(meta.len() as usize);
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    if bytes.len() as u64 > MAX_INPUT_BYTES {
        return Err(too_big(bytes.len() as u64));
    }
    Ok(bytes)
}

/// Read CSV from any reader. The first record is the header row.
pub fn read_csv_reader<R: Read>(reader: R) -> IoResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let mut headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    if let Some(first) = headers.first_mut() {
        // Spreadsheet exports often prepend a BOM.
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_owned();
        }
    }

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        rows.push(rec.iter().map(str::to_owned).collect());
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_headers_and_rows() {
        let src = "Roll,Name,Email\n1401AI01,Asha,a@x.in\n1401CB02,\"Rao, K\",k@x.in\n";
        let t = read_csv_reader(src.as_bytes()).unwrap();
        assert_eq!(t.headers, vec!["Roll", "Name", "Email"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[1][1], "Rao, K");
        assert_eq!(t.column_index("Email"), Some(2));
        assert_eq!(t.column_index("email"), None);
    }

    #[test]
    fn strips_leading_bom() {
        let src = "\u{feff}Roll,Name,Email\n1401AI01,A,a\n";
        let t = read_csv_reader(src.as_bytes()).unwrap();
        assert_eq!(t.column_index("Roll"), Some(0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let src = "Roll,Name,Email\n1401AI01,Asha\n";
        assert!(matches!(read_csv_reader(src.as_bytes()), Err(IoError::Csv(_))));
    }

    #[test]
    fn header_only_is_empty_table() {
        let t = read_csv_reader("Roll,Name,Email\n".as_bytes()).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.headers.len(), 3);
    }

    #[test]
    fn reads_from_path_and_rejects_missing() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("s.csv");
        let mut f = File::create(&p).unwrap();
        writeln!(f, "Roll,Name,Email").unwrap();
        writeln!(f, "1401AI01,Asha,a@x.in").unwrap();
        drop(f);
        let input = read_input(&p).unwrap();
        assert_eq!(input.table.len(), 1);
        assert_eq!(input.sha256, sha256_hex(b"Roll,Name,Email\n1401AI01,Asha,a@x.in\n"));
        assert!(matches!(read_input(&dir.path().join("nope.csv")), Err(IoError::Path(_))));
        assert!(matches!(read_input(Path::new("https://host/s.csv")), Err(IoError::Path(_))));
    }
}
