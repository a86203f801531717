//! # tally-core: Pure Reconciliation Logic for Tally
//!
//! This crate joins three independently sourced record sets (salesmen,
//! products, per-salesman transaction lines) and folds them into the two
//! revenue reports. It performs no I/O: callers hand it already tokenized
//! fields and get typed records, resolved sales and report rows back.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  fields ──► parse ──► Salesman / Product / SaleLine                    │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                   resolver::ReferenceTables                             │
//! │                              │                                          │
//! │                              ▼                                          │
//! │          sale::SaleAssembler ──► Sale (salesman + sold items)          │
//! │                              │                                          │
//! │                              ▼                                          │
//! │   aggregate::salesman_revenue      aggregate::product_revenue           │
//! │                              │                                          │
//! │                              ▼                                          │
//! │            SalesmanReport / ProductReport rows (sorted desc)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records and report rows
//! - [`parse`] - Field-count checked record parsers
//! - [`resolver`] - Foreign-key lookups over the reference tables
//! - [`sale`] - Per-file sale assembly and the validity rule
//! - [`aggregate`] - Per-salesman and per-product revenue folds
//! - [`money`] - Truncation, rounding and rendering of amounts
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::parse::{parse_product, parse_salesman};
//! use tally_core::resolver::ReferenceTables;
//! use tally_core::sale::SaleAssembler;
//! use tally_core::aggregate::salesman_revenue;
//! use tally_core::types::ReportRow;
//!
//! let tables = ReferenceTables::new(
//!     vec![parse_salesman(&["CC", "1", "Ana", "Ruiz"]).unwrap()],
//!     vec![parse_product(&["P1", "Widget", "10.0"]).unwrap()],
//! );
//!
//! let mut assembler = SaleAssembler::new(&tables);
//! assembler.push(&["CC", "1"]);
//! assembler.push(&["P1", "3"]);
//! let sale = assembler.finish().unwrap();
//!
//! let rows = salesman_revenue(&[sale]).unwrap();
//! assert_eq!(rows[0].to_line(), "Ana Ruiz;30");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod money;
pub mod parse;
pub mod resolver;
pub mod sale;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ParseError};
pub use resolver::ReferenceTables;
pub use sale::SaleAssembler;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Field delimiter shared by every input file and both reports.
///
/// No quoting or escaping exists: a value containing this character will
/// split into extra fields and the line is rejected by the field-count check.
pub const FIELD_DELIMITER: u8 = b';';

/// Fields in a salesman info line: `documentType;documentNumber;firstName;lastName`.
pub const SALESMAN_FIELDS: usize = 4;

/// Fields in a catalog line: `productId;productName;unitPrice`.
pub const PRODUCT_FIELDS: usize = 3;

/// Fields in every transaction line, header and product lines alike.
pub const SALE_LINE_FIELDS: usize = 2;
