//! Price and monetary amount utilities.
//!
//! ## Overview
//!
//! Prices are probabilities in `[0, 1]` and monetary amounts are USD; both
//! use [`rust_decimal::Decimal`] for exact decimal arithmetic. Quantities
//! stay integer share counts, so the only multiplications in the core are
//! `Decimal * u64`.
//!
//! ## Textual Form
//!
//! Clients sign the price in the exact textual form they transmitted
//! (`"0.50"` and `"0.5"` sign differently). [`parse_price`] therefore takes
//! the wire string, and callers keep the original string around for
//! signature reconstruction. `Decimal` preserves the scale of its input, so
//! a parsed `"0.50"` also displays as `0.50`.

use rust_decimal::Decimal;

use crate::error::ExchangeError;

/// Parse a wire-form price and validate it lies in `[0, 1]`.
///
/// # Example
///
/// ```
/// use predex::types::price::parse_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price("0.55").unwrap(), Decimal::new(55, 2));
/// assert_eq!(parse_price("1").unwrap(), Decimal::ONE);
/// assert!(parse_price("1.01").is_err());
/// assert!(parse_price("-0.2").is_err());
/// ```
pub fn parse_price(text: &str) -> Result<Decimal, ExchangeError> {
    let price: Decimal = text
        .trim()
        .parse()
        .map_err(|_| ExchangeError::InvalidPrice(text.to_string()))?;
    validate_price(price)?;
    Ok(price)
}

/// Validate a parsed price lies in `[0, 1]`. Both bounds are admitted.
pub fn validate_price(price: Decimal) -> Result<(), ExchangeError> {
    if price < Decimal::ZERO || price > Decimal::ONE {
        return Err(ExchangeError::InvalidPrice(price.to_string()));
    }
    Ok(())
}

/// Notional value of `quantity` shares at `price`.
#[inline]
pub fn notional(price: Decimal, quantity: u64) -> Decimal {
    price * Decimal::from(quantity)
}

/// Monetary collateral backing `quantity` shorted tokens (one unit each).
#[inline]
pub fn collateral(quantity: u64) -> Decimal {
    Decimal::from(quantity)
}

// ============================================================================
// Unit Tests
// ============================================================================
