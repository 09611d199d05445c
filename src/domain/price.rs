//! Price type
//!
//! Non-negative monetary value for catalog products and cart totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DomainError, Quantity};

/// Maximum decimal places (cents)
const MAX_SCALE: u32 = 2;

/// A validated, non-negative price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price.
    ///
    /// # Errors
    /// - `DomainError::InvalidProduct` if the value is negative or has more than 2 decimal places
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value < Decimal::ZERO {
            return Err(DomainError::InvalidProduct("Price cannot be negative".to_string()));
        }
        if value.scale() > MAX_SCALE {
            return Err(DomainError::InvalidProduct(format!(
                "Price has too many decimal places (max {MAX_SCALE})"
            )));
        }
        Ok(Self(value))
    }

    /// Zero price
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Build a price from whole currency units.
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price, or `None` on overflow.
    pub fn checked_times(&self, quantity: Quantity) -> Option<Price> {
        self.0.checked_mul(Decimal::from(quantity.value())).map(Self)
    }

    /// Sum of two prices, or `None` on overflow.
    pub fn checked_add(&self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}
