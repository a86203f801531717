//! # Reference Loaders
//!
//! Loads the salesman info file and the product catalog.
//!
//! Both loaders fail soft: a missing or unreadable file yields an empty list
//! (logged at error level) and a malformed line is skipped (logged at warning
//! level). Downstream steps decide what an empty table means.

use std::path::Path;

use tally_core::error::ParseResult;
use tally_core::parse::{parse_product, parse_salesman};
use tally_core::{Product, ReferenceTables, Salesman};
use tracing::{debug, error, warn};

use crate::delimited::read_lines;

/// Loads `documentType;documentNumber;firstName;lastName` records.
pub fn load_salesmen(path: &Path) -> Vec<Salesman> {
    load_records(path, "salesman", parse_salesman)
}

/// Loads `productId;productName;unitPrice` records.
pub fn load_products(path: &Path) -> Vec<Product> {
    load_records(path, "product", parse_product)
}

/// Loads both files and indexes them for resolution.
pub fn load_reference_tables(salesmen_path: &Path, products_path: &Path) -> ReferenceTables {
    ReferenceTables::new(load_salesmen(salesmen_path), load_products(products_path))
}

fn load_records<T>(path: &Path, kind: &'static str, parse: fn(&[String]) -> ParseResult<T>) -> Vec<T> {
    let lines = match read_lines(path) {
        Ok(lines) => lines,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Cannot read {kind} file, continuing without it");
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(lines.len());
    for line in &lines {
        match parse(&line.fields) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(path = %path.display(), line = line.number, %reason, "Skipping malformed {kind} line");
            }
        }
    }

    debug!(
        path = %path.display(),
        loaded = records.len(),
        skipped = lines.len() - records.len(),
        "Loaded {kind} records"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_salesmen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("salesmen_info.csv");
        fs::write(&path, "CC;1;Ana;Ruiz\nCC;two;Juan;Gomez\nCC;3;Laura\nCC;4;Sofia;Castro\n").unwrap();

        let salesmen = load_salesmen(&path);
        let numbers: Vec<i64> = salesmen.iter().map(|s| s.document_number).collect();
        assert_eq!(numbers, vec![1, 4]);
    }

    #[test]
    fn test_products_file_with_short_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.csv");
        fs::write(&path, "P1;Widget;10.0\nP2;5.0\nP3;Thing;2.5\n").unwrap();

        let products = load_products(&path);
        let ids: Vec<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P3"]);
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let dir = tempdir().unwrap();
        assert!(load_products(&dir.path().join("missing.csv")).is_empty());
        assert!(load_salesmen(&dir.path().join("missing.csv")).is_empty());
    }

    #[test]
    fn test_load_reference_tables() {
        let dir = tempdir().unwrap();
        let salesmen = dir.path().join("salesmen_info.csv");
        let products = dir.path().join("products.csv");
        fs::write(&salesmen, "CC;1;Ana;Ruiz\n").unwrap();
        fs::write(&products, "P1;Widget;10.0\n").unwrap();

        let tables = load_reference_tables(&salesmen, &products);
        assert!(tables.resolve_salesman(1).is_some());
        assert!(tables.resolve_product("P1").is_some());
    }
}
