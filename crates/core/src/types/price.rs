//! Positive price amounts using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum PriceError {
    /// The input is not a number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("price must be greater than zero (got {0})")]
    NotPositive(Decimal),
}

/// A product price.
///
/// Always strictly positive; the catalog has no free or negative-priced
/// items. The server does not re-validate this, so any client touching the
/// data file directly must go through [`Price::parse`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Validate a decimal amount as a price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if the amount is zero or below.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }
        Ok(Self(amount))
    }

    /// Parse a price from its string form (e.g. a form field).
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] if the input does not parse, or
    /// [`PriceError::NotPositive`] if it parses to zero or below.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s.trim().parse().map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
