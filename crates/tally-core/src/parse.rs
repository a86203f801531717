//! # Record Parsers
//!
//! Turns the fields of one delimited line into a typed record.
//!
//! ## Acceptance Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Schema            Fields   Numeric fields                              │
//! │  ───────────────   ──────   ─────────────────────────────────────────   │
//! │  Salesman          4        document_number (integer)                   │
//! │  Product           3        unit_price (decimal, finite)                │
//! │  Transaction line  2        document_number / quantity (integer ≥ 0)    │
//! │                                                                         │
//! │  Any other field count        → ParseError::WrongFieldCount             │
//! │  Numeric conversion failure   → ParseError::InvalidNumber               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected line never aborts its file: loaders log the error and read on.
//! Numeric fields are trimmed before conversion; text fields are kept as-is.

use crate::error::{ParseError, ParseResult};
use crate::types::{Product, Salesman};
use crate::{PRODUCT_FIELDS, SALESMAN_FIELDS, SALE_LINE_FIELDS};

// =============================================================================
// Field Count
// =============================================================================

/// Checks that a line has exactly `expected` fields.
pub fn expect_fields<S: AsRef<str>>(fields: &[S], expected: usize) -> ParseResult<()> {
    if fields.len() != expected {
        return Err(ParseError::WrongFieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Fields
// =============================================================================

/// Parses a salesman document number.
pub fn parse_document_number(raw: &str) -> ParseResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ParseError::invalid_number("documentNumber", raw))
}

/// Parses a unit price. `NaN` and infinities are rejected.
pub fn parse_unit_price(raw: &str) -> ParseResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(ParseError::invalid_number("unitPrice", raw)),
    }
}

/// Parses a sold quantity. Negative values do not convert.
pub fn parse_quantity(raw: &str) -> ParseResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ParseError::invalid_number("quantity", raw))
}

// =============================================================================
// Records
// =============================================================================

/// Parses `documentType;documentNumber;firstName;lastName`.
///
/// ## Example
/// ```rust
/// use tally_core::parse::parse_salesman;
///
/// let salesman = parse_salesman(&["CC", "1", "Ana", "Ruiz"]).unwrap();
/// assert_eq!(salesman.document_number, 1);
/// assert!(parse_salesman(&["CC", "1", "Ana"]).is_err());
/// ```
pub fn parse_salesman<S: AsRef<str>>(fields: &[S]) -> ParseResult<Salesman> {
    expect_fields(fields, SALESMAN_FIELDS)?;
    let document_number = parse_document_number(fields[1].as_ref())?;
    Ok(Salesman::new(
        fields[0].as_ref(),
        document_number,
        fields[2].as_ref(),
        fields[3].as_ref(),
    ))
}

/// Parses `productId;productName;unitPrice`.
pub fn parse_product<S: AsRef<str>>(fields: &[S]) -> ParseResult<Product> {
    expect_fields(fields, PRODUCT_FIELDS)?;
    let unit_price = parse_unit_price(fields[2].as_ref())?;
    Ok(Product::new(fields[0].as_ref(), fields[1].as_ref(), unit_price))
}

/// The two raw fields of a transaction line.
///
/// The header reads them as `(document_type, document_number)`, product lines
/// as `(product_id, quantity)`; which one applies depends on position, so
/// numeric conversion is left to [`SaleAssembler`](crate::sale::SaleAssembler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleLine<'a> {
    pub code: &'a str,
    pub value: &'a str,
}

/// Splits a transaction line into its two fields.
pub fn parse_sale_line<S: AsRef<str>>(fields: &[S]) -> ParseResult<SaleLine<'_>> {
    expect_fields(fields, SALE_LINE_FIELDS)?;
    Ok(SaleLine {
        code: fields[0].as_ref(),
        value: fields[1].as_ref(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_salesman() {
        let s = parse_salesman(&["CC", "10234567", "Maria", "Lopez"]).unwrap();
        assert_eq!(s.document_type, "CC");
        assert_eq!(s.document_number, 10234567);
        assert_eq!(s.first_name, "Maria");
        assert_eq!(s.last_name, "Lopez");
    }

    #[test]
    fn test_parse_salesman_rejects_bad_lines() {
        assert_eq!(
            parse_salesman(&["CC", "1", "Ana"]),
            Err(ParseError::WrongFieldCount {
                expected: 4,
                found: 3
            })
        );
        assert!(parse_salesman(&["CC", "1", "Ana", "Ruiz", "extra"]).is_err());
        assert_eq!(
            parse_salesman(&["CC", "uno", "Ana", "Ruiz"]),
            Err(ParseError::invalid_number("documentNumber", "uno"))
        );
    }

    #[test]
    fn test_parse_product() {
        let p = parse_product(&["7", "Product-7", "42.5"]).unwrap();
        assert_eq!(p.product_id, "7");
        assert_eq!(p.product_name, "Product-7");
        assert_eq!(p.unit_price, 42.5);

        // Integral prices are fine
        assert_eq!(parse_product(&["P1", "Widget", "10"]).unwrap().unit_price, 10.0);
    }

    #[test]
    fn test_parse_product_rejects_bad_lines() {
        assert!(parse_product(&["P1", "Widget"]).is_err());
        assert!(parse_product(&["P1", "Widget", "ten"]).is_err());
        assert!(parse_product(&["P1", "Widget", "NaN"]).is_err());
        assert!(parse_product(&["P1", "Widget", "inf"]).is_err());
    }

    #[test]
    fn test_numeric_fields_are_trimmed() {
        assert_eq!(parse_document_number(" 42 ").unwrap(), 42);
        assert_eq!(parse_unit_price("9.5\t").unwrap(), 9.5);
        assert_eq!(parse_quantity(" 3").unwrap(), 3);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0").unwrap(), 0);
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("2.5").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_parse_sale_line() {
        let fields = vec!["P1".to_string(), "3".to_string()];
        let line = parse_sale_line(&fields).unwrap();
        assert_eq!(line.code, "P1");
        assert_eq!(line.value, "3");

        assert!(parse_sale_line(&["P1"]).is_err());
        assert!(parse_sale_line(&["P1", "3", "x"]).is_err());
    }
}
