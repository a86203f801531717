//! # Transaction Ingestion
//!
//! Turns every file of the sales directory into at most one [`Sale`].
//!
//! Files are read in file-name order so runs over the same directory log the
//! same sequence. One bad file never stops the others: read failures are
//! logged and counted, and the directory walk moves on.

use std::fs;
use std::path::{Path, PathBuf};

use tally_core::sale::LineOutcome;
use tally_core::{ReferenceTables, Sale, SaleAssembler};
use tracing::{debug, error, info, warn};

use crate::delimited::read_lines;
use crate::error::{IoError, IoResult};

/// Result of one pass over the sales directory.
#[derive(Debug, Default)]
pub struct Ingestion {
    /// Valid sales in file-name order.
    pub sales: Vec<Sale>,
    /// Regular files found in the directory, plus unreadable entries.
    pub files_seen: usize,
    /// Files read fine but not yielding a valid sale.
    pub files_dropped: usize,
    /// Files or directory entries that could not be read.
    pub files_failed: usize,
}

/// Reads every regular file directly under `dir` as a transaction file.
///
/// Returns an empty ingestion when the directory is missing or when either
/// reference table is empty, since no sale could resolve.
pub fn ingest_sales(dir: &Path, tables: &ReferenceTables) -> Ingestion {
    if tables.is_incomplete() {
        warn!(
            salesmen = tables.salesmen().len(),
            products = tables.products().len(),
            "Reference data incomplete, skipping sales ingestion"
        );
        return Ingestion::default();
    }

    let listing = match list_files(dir) {
        Ok(listing) => listing,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "Cannot list sales directory");
            return Ingestion::default();
        }
    };

    let mut ingestion = Ingestion {
        files_seen: listing.files.len() + listing.unreadable,
        files_failed: listing.unreadable,
        ..Ingestion::default()
    };

    for path in &listing.files {
        match read_sale(path, tables) {
            Ok(Some(sale)) => ingestion.sales.push(sale),
            Ok(None) => ingestion.files_dropped += 1,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Cannot read sales file, skipping");
                ingestion.files_failed += 1;
            }
        }
    }

    info!(
        dir = %dir.display(),
        files = ingestion.files_seen,
        sales = ingestion.sales.len(),
        dropped = ingestion.files_dropped,
        failed = ingestion.files_failed,
        "Sales ingestion complete"
    );
    ingestion
}

/// Directory contents relevant to ingestion.
#[derive(Debug, Default)]
struct Listing {
    /// Regular files, sorted by file name.
    files: Vec<PathBuf>,
    /// Entries that could not be read while walking the directory.
    unreadable: usize,
}

fn list_files(dir: &Path) -> IoResult<Listing> {
    if !dir.is_dir() {
        return Err(IoError::missing(dir));
    }

    let entries = fs::read_dir(dir).map_err(|e| IoError::io(dir, e))?;
    Ok(collect_files(dir, entries.map(|entry| entry.map(|e| e.path()))))
}

/// Keeps the regular files among `entries`; a failed entry is logged and
/// counted, never fatal.
fn collect_files(dir: &Path, entries: impl IntoIterator<Item = std::io::Result<PathBuf>>) -> Listing {
    let mut listing = Listing::default();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => listing.files.push(path),
            Ok(_) => {}
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "Cannot read sales directory entry, skipping");
                listing.unreadable += 1;
            }
        }
    }
    listing.files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    listing
}

/// Assembles the sale of one file, logging each line that does not count.
fn read_sale(path: &Path, tables: &ReferenceTables) -> IoResult<Option<Sale>> {
    let mut assembler = SaleAssembler::new(tables);

    for line in read_lines(path)? {
        match assembler.push(&line.fields) {
            LineOutcome::Item => {}
            LineOutcome::Header {
                document_number,
                resolved: true,
            } => {
                debug!(path = %path.display(), document_number, "Sales file header resolved");
            }
            LineOutcome::Header {
                document_number,
                resolved: false,
            } => {
                warn!(path = %path.display(), document_number, "Unknown salesman in sales file header");
            }
            LineOutcome::UnknownProduct { product_id } => {
                warn!(path = %path.display(), line = line.number, %product_id, "Unknown product, line ignored");
            }
            LineOutcome::Skipped(reason) => {
                warn!(path = %path.display(), line = line.number, %reason, "Skipping malformed sales line");
            }
        }
    }

    let items = assembler.item_count();
    let sale = assembler.finish();
    if sale.is_none() {
        warn!(path = %path.display(), items, "Sales file has no valid sale, dropping it");
    }
    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{Product, Salesman};
    use tempfile::tempdir;

    fn tables() -> ReferenceTables {
        ReferenceTables::new(
            vec![Salesman::new("CC", 1, "Ana", "Ruiz"), Salesman::new("CC", 2, "Juan", "Gomez")],
            vec![Product::new("P1", "Widget", 10.0)],
        )
    }

    #[test]
    fn test_ingest_in_file_name_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "CC;2\nP1;1\n").unwrap();
        fs::write(dir.path().join("a.csv"), "CC;1\nP1;4\n").unwrap();

        let ingestion = ingest_sales(dir.path(), &tables());
        assert_eq!(ingestion.files_seen, 2);
        let numbers: Vec<i64> = ingestion.sales.iter().map(|s| s.salesman().document_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_invalid_files_are_dropped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("unknown_salesman.csv"), "CC;99\nP1;1\n").unwrap();
        fs::write(dir.path().join("no_items.csv"), "CC;1\nP9;3\n").unwrap();
        fs::write(dir.path().join("no_valid_header.csv"), "CC;x\nP1;many\n").unwrap();
        fs::write(dir.path().join("empty.csv"), "").unwrap();

        let ingestion = ingest_sales(dir.path(), &tables());
        assert!(ingestion.sales.is_empty());
        assert_eq!(ingestion.files_seen, 4);
        assert_eq!(ingestion.files_dropped, 4);
    }

    #[test]
    fn test_unparsable_header_line_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "CC;abc\nCC;1\nP1;3\n").unwrap();

        let ingestion = ingest_sales(dir.path(), &tables());
        assert_eq!(ingestion.sales.len(), 1);
        assert_eq!(ingestion.sales[0].salesman().document_number, 1);
        assert_eq!(ingestion.sales[0].items().len(), 1);
    }

    #[test]
    fn test_unreadable_entry_does_not_stop_listing() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("a.csv");
        fs::write(&good, "CC;1\nP1;1\n").unwrap();

        let entries = vec![
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")),
            Ok(good.clone()),
        ];
        let listing = collect_files(dir.path(), entries);
        assert_eq!(listing.files, vec![good]);
        assert_eq!(listing.unreadable, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_counted_and_others_ingested() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("a_locked.csv");
        fs::write(&locked, "CC;2\nP1;1\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        fs::write(dir.path().join("b.csv"), "CC;1\nP1;4\n").unwrap();

        // Permission bits do not stop a privileged user.
        if fs::File::open(&locked).is_ok() {
            return;
        }

        let ingestion = ingest_sales(dir.path(), &tables());
        assert_eq!(ingestion.files_seen, 2);
        assert_eq!(ingestion.files_failed, 1);
        assert_eq!(ingestion.sales.len(), 1);
        assert_eq!(ingestion.sales[0].salesman().document_number, 1);
    }

    #[test]
    fn test_subdirectories_ignored() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/a.csv"), "CC;1\nP1;1\n").unwrap();

        let ingestion = ingest_sales(dir.path(), &tables());
        assert_eq!(ingestion.files_seen, 0);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let ingestion = ingest_sales(&dir.path().join("missing"), &tables());
        assert!(ingestion.sales.is_empty());
        assert_eq!(ingestion.files_seen, 0);
    }

    #[test]
    fn test_incomplete_tables_skip_ingestion() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "CC;1\nP1;1\n").unwrap();

        let tables = ReferenceTables::new(vec![Salesman::new("CC", 1, "Ana", "Ruiz")], Vec::new());
        let ingestion = ingest_sales(dir.path(), &tables);
        assert!(ingestion.sales.is_empty());
        assert_eq!(ingestion.files_seen, 0);
    }
}
