//! CSV output and post-write verification

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::transform::OutputRow;

/// Written file does not hold one header plus one record per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationFailure {
    pub path: PathBuf,
    /// rows + 1 header
    pub expected: usize,
    pub observed: usize,
}

impl std::fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CSV verification failed for {}: expected {} records (rows + header), found {}",
            self.path.display(),
            self.expected,
            self.observed
        )
    }
}

impl std::error::Error for VerificationFailure {}

/// Delete a previous output file so the run starts from nothing.
pub fn remove_existing(path: &Path) -> anyhow::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed previous {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Cannot remove {}", path.display())),
    }
}

/// Append header + rows to `path`, creating it if needed.
pub fn write_rows(path: &Path, rows: &[OutputRow]) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer
        .write_record(OutputRow::HEADER)
        .with_context(|| format!("Failed to write header to {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row {} to {}", row.object_id, path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Count CSV records (header included) in the file at `path`.
///
/// Quoted cells may span lines, so this counts records rather than raw lines.
pub fn count_records(path: &Path) -> anyhow::Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot read back {}", path.display()))?;
    let mut count = 0;
    for record in reader.records() {
        record.with_context(|| format!("Malformed CSV in {}", path.display()))?;
        count += 1;
    }
    Ok(count)
}

/// Check that `path` holds exactly `rows + 1` records.
pub fn verify(path: &Path, rows: usize) -> anyhow::Result<()> {
    let observed = count_records(path)?;
    let expected = rows + 1;
    if observed != expected {
        return Err(VerificationFailure {
            path: path.to_path_buf(),
            expected,
            observed,
        }
        .into());
    }
    log::debug!("{}: {observed} records verified", path.display());
    Ok(())
}

/// Write rows then read the file back to confirm nothing was lost.
pub fn write_and_verify(path: &Path, rows: &[OutputRow]) -> anyhow::Result<()> {
    write_rows(path, rows)?;
    verify(path, rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(n: usize) -> OutputRow {
        OutputRow {
            author: format!("user{n}"),
            created_at: "2023-05-01 07:00:00".to_string(),
            object_id: n.to_string(),
            comment_text: format!("comment {n}"),
            bio: String::new(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let rows: Vec<_> = (0..3).map(row).collect();

        write_and_verify(&path, &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "author,created_at,object_id,comment_text,bio");
        assert_eq!(lines[1], "user0,2023-05-01 07:00:00,0,comment 0,");
    }

    #[test]
    fn empty_rows_still_get_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_and_verify(&path, &[]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "author,created_at,object_id,comment_text,bio\n");
    }

    #[test]
    fn dropped_row_fails_verification() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let rows: Vec<_> = (0..5).map(row).collect();

        // Writer that loses the last row
        write_rows(&path, &rows[..4]).unwrap();
        let err = verify(&path, rows.len()).unwrap_err();
        let failure = err.downcast_ref::<VerificationFailure>().unwrap();
        assert_eq!(failure.expected, 6);
        assert_eq!(failure.observed, 5);
        assert!(format!("{err}").contains("expected 6"));
    }

    #[test]
    fn multiline_cells_count_as_one_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut r = row(0);
        r.comment_text = "first\n\nsecond".to_string();
        write_and_verify(&path, &[r]).unwrap();
        assert_eq!(count_records(&path).unwrap(), 2);
    }

    #[test]
    fn appending_to_stale_file_is_caught() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_rows(&path, &[row(0)]).unwrap();
        let err = write_and_verify(&path, &[row(1)]).unwrap_err();
        let failure = err.downcast_ref::<VerificationFailure>().unwrap();
        assert_eq!((failure.expected, failure.observed), (2, 4));
    }

    #[test]
    fn remove_existing_is_noop_when_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        remove_existing(&path).unwrap();
        std::fs::write(&path, "x").unwrap();
        remove_existing(&path).unwrap();
        assert!(!path.exists());
    }
}
