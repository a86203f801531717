//! # tally-io: Flat-File Layer for Tally
//!
//! Reads the salesman, product and transaction files, hands their fields to
//! `tally-core`, and writes the resulting reports back out.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally File Flow                                  │
//! │                                                                         │
//! │  files/info/salesmen_info.csv ──┐                                      │
//! │  files/info/products.csv ───────┼──► reference ──► ReferenceTables     │
//! │                                 │                        │              │
//! │  files/salesmen/*.csv ──────────┴──► ingest ──► Vec<Sale>               │
//! │                                                          │              │
//! │                               tally-core aggregate ◄─────┘              │
//! │                                          │                              │
//! │  files/reports/salesmen_report.csv ◄─────┤ report                       │
//! │  files/reports/products_report.csv ◄─────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`delimited`] - Semicolon-delimited reader/writer setup (csv crate)
//! - [`reference`] - Salesman and product file loaders
//! - [`ingest`] - Transaction directory ingestion
//! - [`report`] - Report writer
//! - [`pipeline`] - The full load → aggregate → write run
//! - [`generator`] - Seeded synthetic datasets
//! - [`error`] - I/O error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tally_io::pipeline::{self, Layout};
//!
//! let summary = pipeline::run(&Layout::default());
//! println!("{} sales accepted", summary.sales);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod delimited;
pub mod error;
pub mod generator;
pub mod ingest;
pub mod pipeline;
pub mod reference;
pub mod report;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{IoError, IoResult};
pub use generator::{DatasetSummary, Generator, GeneratorSettings};
pub use ingest::{ingest_sales, Ingestion};
pub use pipeline::{Layout, ReportOutcome, RunSummary};
pub use reference::{load_products, load_reference_tables, load_salesmen};
pub use report::write_report;
