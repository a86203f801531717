//! # Delimited Files
//!
//! Reader and writer setup shared by every input file and report.
//!
//! ## Dialect
//! - Delimiter: `;`
//! - No header row, no quoting, no escaping
//! - Lines may have any number of fields; schemas are checked by the parsers
//! - Empty trailing fields are dropped, so `P1;Widget;10.0;` has 3 fields
//! - Blank lines are ignored

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use tally_core::FIELD_DELIMITER;
use tracing::warn;

use crate::error::{IoError, IoResult};

/// One non-blank line of a delimited file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source file.
    pub number: u64,
    pub fields: Vec<String>,
}

/// Reads every line of `path` into fields.
///
/// A line that is not valid UTF-8 is logged and skipped; any other failure
/// aborts the read of this file.
///
/// ## Errors
/// [`IoError::MissingInput`] when the file does not exist, otherwise
/// [`IoError::Csv`] for read failures.
pub fn read_lines(path: &Path) -> IoResult<Vec<Line>> {
    if !path.is_file() {
        return Err(IoError::missing(path));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(|e| IoError::csv(path, e))?;

    let mut lines = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {
                let number = record.position().map_or(0, |p| p.line());
                let fields = trimmed_fields(&record);
                if !fields.is_empty() {
                    lines.push(Line { number, fields });
                }
            }
            Ok(false) => break,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                let line = e.position().map_or(0, |p| p.line());
                warn!(path = %path.display(), line, "Skipping line that is not valid UTF-8");
            }
            Err(e) => return Err(IoError::csv(path, e)),
        }
    }

    Ok(lines)
}

/// Fields of a record without its empty tail.
fn trimmed_fields(record: &StringRecord) -> Vec<String> {
    let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

/// Opens `path` for writing in the report dialect, truncating it.
///
/// Parent directories are created when missing.
pub fn create_writer(path: &Path) -> IoResult<csv::Writer<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IoError::io(parent, e))?;
    }

    WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_path(path)
        .map_err(|e| IoError::csv(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.csv");
        fs::write(&path, "P1;Widget;10.0\n\nP2;Gadget\nP3;Thing;2.5;\n").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].fields, vec!["P1", "Widget", "10.0"]);
        assert_eq!(lines[1].fields, vec!["P2", "Gadget"]);
        // Trailing delimiter does not add a field
        assert_eq!(lines[2].fields, vec!["P3", "Thing", "2.5"]);
    }

    #[test]
    fn test_quotes_are_literal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("salesmen.csv");
        fs::write(&path, "CC;1;\"Ana;Maria\";Ruiz\n").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines[0].fields.len(), 5);
    }

    #[test]
    fn test_crlf_line_endings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sale.csv");
        fs::write(&path, "CC;1\r\nP1;3\r\n").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines[1].fields, vec!["P1", "3"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_lines(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, IoError::MissingInput { .. }));
    }

    #[test]
    fn test_create_writer_makes_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports/nested/out.csv");
        let mut writer = create_writer(&path).unwrap();
        writer.write_record(["Ana Ruiz", "40"]).unwrap();
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Ana Ruiz;40\n");
    }
}
