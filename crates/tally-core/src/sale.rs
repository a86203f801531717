//! # Sale Assembly
//!
//! Builds one [`Sale`] from the lines of one transaction file.
//!
//! ## Line Roles
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  File: Ana Ruiz_1.csv                                                   │
//! │                                                                         │
//! │  CC;1          ◄── first valid 2-field line: header, resolves salesman │
//! │  P1;3          ◄── product line                                        │
//! │  bogus         ◄── wrong field count: skipped                          │
//! │  P9;1          ◄── unknown product: contributes nothing                │
//! │  P2;2          ◄── product line                                        │
//! │                                                                         │
//! │  finish() ──► Some(Sale) only if salesman resolved AND ≥ 1 item        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The header is the first well-formed 2-field line: a line whose document
//! number does not parse is skipped like any other malformed line, and the
//! next 2-field line gets the header slot.

use std::sync::Arc;

use crate::error::ParseError;
use crate::parse::{parse_document_number, parse_quantity, parse_sale_line};
use crate::resolver::ReferenceTables;
use crate::types::{ProductSold, Sale, Salesman};

/// What happened to one pushed line. Lets the caller log per line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Header consumed; `resolved` tells whether the salesman is known.
    Header { document_number: i64, resolved: bool },

    /// A sold item was recorded.
    Item,

    /// Well-formed product line naming a product missing from the catalog.
    UnknownProduct { product_id: String },

    /// Line rejected by the parser.
    Skipped(ParseError),
}

/// Incremental builder for the sale of one transaction file.
#[derive(Debug)]
pub struct SaleAssembler<'t> {
    tables: &'t ReferenceTables,
    header_seen: bool,
    salesman: Option<Arc<Salesman>>,
    items: Vec<ProductSold>,
}

impl<'t> SaleAssembler<'t> {
    pub fn new(tables: &'t ReferenceTables) -> Self {
        SaleAssembler {
            tables,
            header_seen: false,
            salesman: None,
            items: Vec::new(),
        }
    }

    /// Feeds the fields of the next line in file order.
    pub fn push<S: AsRef<str>>(&mut self, fields: &[S]) -> LineOutcome {
        let line = match parse_sale_line(fields) {
            Ok(line) => line,
            Err(e) => return LineOutcome::Skipped(e),
        };

        if !self.header_seen {
            let document_number = match parse_document_number(line.value) {
                Ok(document_number) => document_number,
                Err(e) => return LineOutcome::Skipped(e),
            };
            self.header_seen = true;
            self.salesman = self.tables.resolve_salesman(document_number).cloned();
            return LineOutcome::Header {
                document_number,
                resolved: self.salesman.is_some(),
            };
        }

        let quantity = match parse_quantity(line.value) {
            Ok(quantity) => quantity,
            Err(e) => return LineOutcome::Skipped(e),
        };

        match self.tables.resolve_product(line.code) {
            Some(product) => {
                self.items.push(ProductSold::new(Arc::clone(product), quantity));
                LineOutcome::Item
            }
            None => LineOutcome::UnknownProduct {
                product_id: line.code.to_string(),
            },
        }
    }

    /// The resolved salesman, if the header matched one.
    pub fn salesman(&self) -> Option<&Arc<Salesman>> {
        self.salesman.as_ref()
    }

    /// Number of items recorded so far.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Applies the validity rule and yields the sale, if any.
    pub fn finish(self) -> Option<Sale> {
        let salesman = self.salesman?;
        Sale::new(salesman, self.items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
