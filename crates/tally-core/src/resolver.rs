//! # Reference Resolver
//!
//! Read-only lookup tables for the two reference record sets.
//!
//! ## Lookup Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Foreign-Key Resolution                              │
//! │                                                                         │
//! │  Transaction header  "CC;1"    ── document number 1 ──► Salesman        │
//! │                                   (integer equality, type ignored)      │
//! │                                                                         │
//! │  Product line        "P1;3"    ── product id "P1" ───► Product          │
//! │                                   (exact string equality)               │
//! │                                                                         │
//! │  No match → None. Resolution never fails with an error.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transaction header only carries a document number that the sale
//! ingestor can trust, so salesmen are indexed by number alone. When the
//! source file repeats a key, the record loaded first wins.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{Product, Salesman};

/// Salesmen and products loaded once per run.
///
/// Records are held behind `Arc` so resolved sales can point at them without
/// copying; the tables themselves are never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    salesmen: Vec<Arc<Salesman>>,
    products: Vec<Arc<Product>>,
    by_document: HashMap<i64, usize>,
    by_product_id: HashMap<String, usize>,
}

impl ReferenceTables {
    /// Indexes the given records, keeping their load order.
    pub fn new(salesmen: Vec<Salesman>, products: Vec<Product>) -> Self {
        let salesmen: Vec<Arc<Salesman>> = salesmen.into_iter().map(Arc::new).collect();
        let products: Vec<Arc<Product>> = products.into_iter().map(Arc::new).collect();

        let mut by_document = HashMap::with_capacity(salesmen.len());
        for (idx, salesman) in salesmen.iter().enumerate() {
            by_document.entry(salesman.document_number).or_insert(idx);
        }

        let mut by_product_id = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            by_product_id
                .entry(product.product_id.clone())
                .or_insert(idx);
        }

        ReferenceTables {
            salesmen,
            products,
            by_document,
            by_product_id,
        }
    }

    /// Finds the salesman with this document number.
    pub fn resolve_salesman(&self, document_number: i64) -> Option<&Arc<Salesman>> {
        self.by_document
            .get(&document_number)
            .map(|&idx| &self.salesmen[idx])
    }

    /// Finds the product with this id.
    pub fn resolve_product(&self, product_id: &str) -> Option<&Arc<Product>> {
        self.by_product_id
            .get(product_id)
            .map(|&idx| &self.products[idx])
    }

    /// All salesmen in load order.
    pub fn salesmen(&self) -> &[Arc<Salesman>] {
        &self.salesmen
    }

    /// The product catalog in load order.
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    /// True when either table is empty. No sale can resolve in that case.
    pub fn is_incomplete(&self) -> bool {
        self.salesmen.is_empty() || self.products.is_empty()
    }
}
