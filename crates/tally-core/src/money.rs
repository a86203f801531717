//! # Money Module
//!
//! Amount arithmetic for the two reports.
//!
//! ## Two Rounding Policies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SALESMAN REPORT                     PRODUCT REPORT                     │
//! │                                                                         │
//! │  Σ quantity × unit_price             round(Σ quantity × unit_price, 2)  │
//! │  truncated toward zero               half away from zero                │
//! │                                                                         │
//! │  39.99 → 39                          3 × 0.125 = 0.375 → 0.38           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The asymmetry is carried over unchanged from the reports this tool
//! replaces. Amounts are plain `f64`; there is no currency or locale layer.

// =============================================================================
// Arithmetic
// =============================================================================

/// Extended amount of one line: `quantity × unit_price`.
#[inline]
pub fn line_amount(quantity: u64, unit_price: f64) -> f64 {
    quantity as f64 * unit_price
}

/// Drops the fractional part, rounding toward zero.
///
/// ## Example
/// ```rust
/// use tally_core::money::truncate_whole;
///
/// assert_eq!(truncate_whole(39.99), 39);
/// assert_eq!(truncate_whole(40.0), 40);
/// ```
#[inline]
pub fn truncate_whole(amount: f64) -> i64 {
    // `as` saturates on overflow and maps NaN to 0.
    amount.trunc() as i64
}

/// Rounds to 2 decimal places, halves away from zero.
///
/// ## Example
/// ```rust
/// use tally_core::money::round_cents;
///
/// assert_eq!(round_cents(0.125), 0.13);
/// assert_eq!(round_cents(0.25), 0.25);
/// ```
#[inline]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders a decimal total for the product report.
///
/// Whole values keep one fractional digit (`30.0`); anything else uses the
/// shortest representation that reads back to the same value (`12.35`).
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 {
        format!("{amount:.1}")
    } else {
        format!("{amount}")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_whole() {
        assert_eq!(truncate_whole(0.0), 0);
        assert_eq!(truncate_whole(40.999), 40);
        assert_eq!(truncate_whole(-3.7), -3);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(30.0), 30.0);
        assert_eq!(round_cents(0.375), 0.38);
        assert_eq!(round_cents(2.0 * 0.125), 0.25);
    }

    /// Rounding once per product differs from rounding per line.
    #[test]
    fn test_round_once_vs_per_line() {
        let per_line = round_cents(line_amount(1, 0.125)) + round_cents(line_amount(1, 0.125));
        let merged = round_cents(line_amount(2, 0.125));
        assert_eq!(per_line, 0.26);
        assert_eq!(merged, 0.25);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(30.0), "30.0");
        assert_eq!(format_amount(10.0), "10.0");
        assert_eq!(format_amount(12.35), "12.35");
        assert_eq!(format_amount(0.25), "0.25");
        assert_eq!(format_amount(0.0), "0.0");
    }
}
