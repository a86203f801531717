//! # Report Pipeline
//!
//! One full run: load reference files, ingest sales, write both reports.
//!
//! ## Run Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load_reference_tables ──► ingest_sales ──┬──► salesman_revenue ──► write│
//! │                                           │                              │
//! │                                           └──► product_revenue ───► write│
//! │                                                                          │
//! │  Each report is attempted on its own. A failure is logged, recorded in   │
//! │  the RunSummary, and never stops the other report.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::aggregate::{product_revenue, salesman_revenue};
use tally_core::{CoreResult, ReportRow};
use tracing::{error, info};

use crate::error::{IoError, IoResult};
use crate::ingest::ingest_sales;
use crate::reference::load_reference_tables;
use crate::report::write_report;

// =============================================================================
// Layout
// =============================================================================

/// Where a run reads its inputs and writes its reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub salesmen_file: PathBuf,
    pub products_file: PathBuf,
    pub sales_dir: PathBuf,
    pub salesmen_report: PathBuf,
    pub products_report: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            salesmen_file: PathBuf::from("files/info/salesmen_info.csv"),
            products_file: PathBuf::from("files/info/products.csv"),
            sales_dir: PathBuf::from("files/salesmen"),
            salesmen_report: PathBuf::from("files/reports/salesmen_report.csv"),
            products_report: PathBuf::from("files/reports/products_report.csv"),
        }
    }
}

impl Layout {
    /// Layout with the default relative paths placed under `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let defaults = Layout::default();
        Layout {
            salesmen_file: root.join(defaults.salesmen_file),
            products_file: root.join(defaults.products_file),
            sales_dir: root.join(defaults.sales_dir),
            salesmen_report: root.join(defaults.salesmen_report),
            products_report: root.join(defaults.products_report),
        }
    }
}

// =============================================================================
// Run Summary
// =============================================================================

/// What happened to one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Written { path: PathBuf, rows: usize },
    Failed { path: PathBuf, error: String },
}

impl ReportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ReportOutcome::Written { .. })
    }
}

/// Counts and outcomes of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub salesmen: usize,
    pub products: usize,
    pub sale_files: usize,
    pub sales: usize,
    pub salesmen_report: ReportOutcome,
    pub products_report: ReportOutcome,
}

impl RunSummary {
    /// Pretty JSON rendering for `--json` output.
    pub fn to_json(&self) -> IoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Run
// =============================================================================

/// Runs the full load, aggregate and write flow for `layout`.
///
/// Never fails as a whole: degraded inputs lead to fewer sales, and a report
/// that cannot be built or written shows up as [`ReportOutcome::Failed`].
pub fn run(layout: &Layout) -> RunSummary {
    info!(sales_dir = %layout.sales_dir.display(), "Starting report run");

    let tables = load_reference_tables(&layout.salesmen_file, &layout.products_file);
    let ingestion = ingest_sales(&layout.sales_dir, &tables);
    let sales = &ingestion.sales;

    let salesmen_report = produce("salesman", &layout.salesmen_report, || salesman_revenue(sales));
    let products_report = produce("product", &layout.products_report, || {
        product_revenue(sales, tables.products())
    });

    let summary = RunSummary {
        generated_at: Utc::now(),
        salesmen: tables.salesmen().len(),
        products: tables.products().len(),
        sale_files: ingestion.files_seen,
        sales: sales.len(),
        salesmen_report,
        products_report,
    };

    info!(
        sales = summary.sales,
        salesmen_report = summary.salesmen_report.is_written(),
        products_report = summary.products_report.is_written(),
        "Report run finished"
    );
    summary
}

/// Builds one report and writes it, turning any failure into an outcome.
fn produce<R, F>(kind: &'static str, path: &Path, build: F) -> ReportOutcome
where
    R: ReportRow,
    F: FnOnce() -> CoreResult<Vec<R>>,
{
    let result = build()
        .map_err(IoError::from)
        .and_then(|rows| write_report(&rows, path));

    match result {
        Ok(rows) => ReportOutcome::Written {
            path: path.to_path_buf(),
            rows,
        },
        Err(e) => {
            error!(path = %path.display(), error = %e, "Cannot produce {kind} report");
            ReportOutcome::Failed {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_layout_under_root() {
        let layout = Layout::under("/data");
        assert_eq!(layout.sales_dir, PathBuf::from("/data/files/salesmen"));
        assert_eq!(
            layout.products_report,
            PathBuf::from("/data/files/reports/products_report.csv")
        );
    }

    #[test]
    fn test_run_without_inputs_records_failures() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());

        let summary = run(&layout);
        assert_eq!(summary.sales, 0);
        assert!(!summary.salesmen_report.is_written());
        assert!(!summary.products_report.is_written());
        assert!(!layout.salesmen_report.exists());
    }

    #[test]
    fn test_summary_json() {
        let dir = tempdir().unwrap();
        let layout = Layout::under(dir.path());
        fs::create_dir_all(dir.path().join("files/info")).unwrap();
        fs::create_dir_all(&layout.sales_dir).unwrap();
        fs::write(&layout.salesmen_file, "CC;1;Ana;Ruiz\n").unwrap();
        fs::write(&layout.products_file, "P1;Widget;10.0\n").unwrap();
        fs::write(layout.sales_dir.join("Ana Ruiz_1.csv"), "CC;1\nP1;2\n").unwrap();

        let summary = run(&layout);
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["sales"], 1);
        assert_eq!(json["salesmen_report"]["status"], "written");
        assert_eq!(json["products_report"]["rows"], 1);
    }
}
