//! # Domain Types
//!
//! Records read from the input files and the rows written to the reports.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Salesman     │   │      Sale       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  document_type  │◄──│  salesman       │   │  product_id     │       │
//! │  │  document_number│   │  items ─────────┼──►│  product_name   │       │
//! │  │  first_name     │   │  (ProductSold)  │   │  unit_price     │       │
//! │  │  last_name      │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Report rows:  SalesmanReport (whole units)                            │
//! │                ProductReport  (2 decimals)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Salesmen are identified by `(document_type, document_number)` and products
//! by `product_id`. Equality and hashing use only those keys; names and
//! prices never take part.

use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::money;

// =============================================================================
// Salesman
// =============================================================================

/// Value-type identity of a salesman.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SalesmanKey {
    pub document_type: String,
    pub document_number: i64,
}

/// A salesman from the info file.
#[derive(Debug, Clone, Serialize)]
pub struct Salesman {
    /// Identity document type, e.g. `CC`.
    pub document_type: String,

    /// Identity document number. Transaction headers reference this.
    pub document_number: i64,

    pub first_name: String,

    pub last_name: String,
}

impl Salesman {
    pub fn new(
        document_type: impl Into<String>,
        document_number: i64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Salesman {
            document_type: document_type.into(),
            document_number,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Returns the identity key.
    pub fn key(&self) -> SalesmanKey {
        SalesmanKey {
            document_type: self.document_type.clone(),
            document_number: self.document_number,
        }
    }

    /// `"First Last"`, as printed in the salesman report.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl PartialEq for Salesman {
    fn eq(&self, other: &Self) -> bool {
        self.document_type == other.document_type
            && self.document_number == other.document_number
    }
}

impl Eq for Salesman {}

impl Hash for Salesman {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document_type.hash(state);
        self.document_number.hash(state);
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Business identifier referenced by transaction lines.
    pub product_id: String,

    /// Display name printed in the product report.
    pub product_name: String,

    /// Price of one unit. Plain floating point, no currency handling.
    pub unit_price: f64,
}

impl Product {
    pub fn new(product_id: impl Into<String>, product_name: impl Into<String>, unit_price: f64) -> Self {
        Product {
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price,
        }
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.product_id == other.product_id
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product_id.hash(state);
    }
}

// =============================================================================
// Product Sold
// =============================================================================

/// One resolved line item of a sale.
#[derive(Debug, Clone)]
pub struct ProductSold {
    /// Shared handle into the product catalog.
    pub product: Arc<Product>,

    /// Units sold on this line.
    pub quantity: u32,
}

impl ProductSold {
    pub fn new(product: Arc<Product>, quantity: u32) -> Self {
        ProductSold { product, quantity }
    }

    /// `quantity × unit_price`, unrounded.
    #[inline]
    pub fn amount(&self) -> f64 {
        money::line_amount(u64::from(self.quantity), self.product.unit_price)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// The resolved contents of one transaction file.
///
/// A `Sale` always has a resolved salesman and at least one item; files that
/// fail either condition never become a `Sale` (see [`Sale::new`]).
#[derive(Debug, Clone)]
pub struct Sale {
    salesman: Arc<Salesman>,
    items: Vec<ProductSold>,
}

impl Sale {
    /// Builds a sale, or `None` when there is nothing sold.
    pub fn new(salesman: Arc<Salesman>, items: Vec<ProductSold>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Sale { salesman, items })
    }

    pub fn salesman(&self) -> &Arc<Salesman> {
        &self.salesman
    }

    /// Line items in file order.
    pub fn items(&self) -> &[ProductSold] {
        &self.items
    }
}

// =============================================================================
// Report Rows
// =============================================================================

/// Behaviour shared by both report row kinds.
pub trait ReportRow {
    /// Name column (salesman full name or product name).
    fn label(&self) -> &str;

    /// Total used for ranking.
    fn rank_value(&self) -> f64;

    /// Total column exactly as written to the report.
    fn rendered_total(&self) -> String;

    /// `label;total`, one report line without the terminator.
    fn to_line(&self) -> String {
        format!("{};{}", self.label(), self.rendered_total())
    }
}

/// Revenue collected by one salesman.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesmanReport {
    pub full_name: String,

    /// Truncated toward zero; fractional currency is dropped in this view.
    pub total_revenue: i64,
}

impl ReportRow for SalesmanReport {
    fn label(&self) -> &str {
        &self.full_name
    }

    fn rank_value(&self) -> f64 {
        self.total_revenue as f64
    }

    fn rendered_total(&self) -> String {
        self.total_revenue.to_string()
    }
}

/// Revenue generated by one product across every sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductReport {
    pub product_name: String,

    /// Rounded to 2 decimal places.
    pub total_revenue: f64,
}

impl ReportRow for ProductReport {
    fn label(&self) -> &str {
        &self.product_name
    }

    fn rank_value(&self) -> f64 {
        self.total_revenue
    }

    fn rendered_total(&self) -> String {
        money::format_amount(self.total_revenue)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
