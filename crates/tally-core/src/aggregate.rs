//! # Aggregation Engine
//!
//! Folds accepted sales into the two report views.
//!
//! ## Folds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Aggregation Engine                                 │
//! │                                                                         │
//! │  Sales ──┬──► group by SalesmanKey                                     │
//! │          │      └─► per product id: Σ quantity                         │
//! │          │            └─► Σ quantity × unit_price ──► truncate         │
//! │          │                                   SalesmanReport rows        │
//! │          │                                                              │
//! │          └──► merge every item by product id: Σ quantity               │
//! │                 └─► round(Σ quantity × unit_price, 2)                  │
//! │                                              ProductReport rows         │
//! │                                                                         │
//! │  Both views ──► stable sort, highest total first                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities are summed as integers before any price is applied, and the
//! per-product amounts of a salesman are added in product id order. Totals
//! are therefore identical for any ordering of files or of lines.
//!
//! Rows start out in first-appearance order, which only matters for ties.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::money::{line_amount, round_cents, truncate_whole};
use crate::types::{Product, ProductReport, ReportRow, Sale, Salesman, SalesmanKey, SalesmanReport};

// =============================================================================
// Ranking
// =============================================================================

/// Sorts rows by descending total. Ties keep their relative order.
pub fn rank_descending<R: ReportRow>(rows: &mut [R]) {
    rows.sort_by(|a, b| {
        b.rank_value()
            .partial_cmp(&a.rank_value())
            .unwrap_or(Ordering::Equal)
    });
}

// =============================================================================
// Per-Salesman Revenue
// =============================================================================

/// Running totals for one salesman.
struct SalesmanTally {
    salesman: Arc<Salesman>,
    /// product id → (units, unit price)
    units: BTreeMap<String, (u64, f64)>,
}

impl SalesmanTally {
    fn revenue(&self) -> f64 {
        self.units
            .values()
            .map(|&(units, price)| line_amount(units, price))
            .sum()
    }
}

/// Revenue collected per salesman, truncated to whole units.
///
/// Several sales for the same salesman (same document type and number)
/// collapse into one row.
///
/// ## Errors
/// [`CoreError::NoSales`] when `sales` is empty.
pub fn salesman_revenue(sales: &[Sale]) -> CoreResult<Vec<SalesmanReport>> {
    if sales.is_empty() {
        return Err(CoreError::NoSales);
    }

    let mut index: HashMap<SalesmanKey, usize> = HashMap::new();
    let mut tallies: Vec<SalesmanTally> = Vec::new();

    for sale in sales {
        let idx = *index.entry(sale.salesman().key()).or_insert_with(|| {
            tallies.push(SalesmanTally {
                salesman: Arc::clone(sale.salesman()),
                units: BTreeMap::new(),
            });
            tallies.len() - 1
        });

        let tally = &mut tallies[idx];
        for item in sale.items() {
            let entry = tally
                .units
                .entry(item.product.product_id.clone())
                .or_insert((0, item.product.unit_price));
            entry.0 += u64::from(item.quantity);
        }
    }

    let mut rows: Vec<SalesmanReport> = tallies
        .iter()
        .map(|tally| SalesmanReport {
            full_name: tally.salesman.full_name(),
            total_revenue: truncate_whole(tally.revenue()),
        })
        .collect();

    rank_descending(&mut rows);
    Ok(rows)
}

// =============================================================================
// Per-Product Revenue
// =============================================================================

/// Revenue generated per product, rounded once per product.
///
/// Quantities for a product id are merged across every sale first; only then
/// is the unit price applied and the result rounded to 2 places. Name and
/// price come from `products`; a sold id missing from it is left out.
///
/// ## Errors
/// [`CoreError::NoSales`] when `sales` is empty, [`CoreError::NoProducts`]
/// when `products` is empty.
pub fn product_revenue(sales: &[Sale], products: &[Arc<Product>]) -> CoreResult<Vec<ProductReport>> {
    if sales.is_empty() {
        return Err(CoreError::NoSales);
    }
    if products.is_empty() {
        return Err(CoreError::NoProducts);
    }

    let mut catalog: HashMap<&str, &Product> = HashMap::with_capacity(products.len());
    for product in products {
        catalog.entry(product.product_id.as_str()).or_insert(product);
    }

    // First-appearance order of product ids, with merged units.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut merged: Vec<(&str, u64)> = Vec::new();

    for sale in sales {
        for item in sale.items() {
            let id = item.product.product_id.as_str();
            let idx = *index.entry(id).or_insert_with(|| {
                merged.push((id, 0));
                merged.len() - 1
            });
            merged[idx].1 += u64::from(item.quantity);
        }
    }

    let mut rows: Vec<ProductReport> = merged
        .into_iter()
        .filter_map(|(id, units)| {
            catalog.get(id).map(|product| ProductReport {
                product_name: product.product_name.clone(),
                total_revenue: round_cents(line_amount(units, product.unit_price)),
            })
        })
        .collect();

    rank_descending(&mut rows);
    Ok(rows)
}

// =============================================================================
// Unit Tests
// =============================================================================
