//! Quantity type
//!
//! Domain primitive for cart line quantities. A quantity is validated at
//! construction time, so a line item can never hold zero or a negative count.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

/// A line-item quantity.
///
/// # Invariants
/// - Value is always at least 1
///
/// # Example
/// ```
/// use art_market::domain::Quantity;
///
/// let quantity = Quantity::new(2).unwrap();
/// assert_eq!(quantity.value(), 2);
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// Smallest allowed quantity.
    pub const ONE: Quantity = Quantity(1);

    /// Create a new Quantity with validation.
    ///
    /// # Errors
    /// - `DomainError::InvalidQuantity` if value < 1 or does not fit the storage column
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value < 1 {
            return Err(DomainError::InvalidQuantity(value));
        }
        let value = i32::try_from(value).map_err(|_| DomainError::InvalidQuantity(value))?;
        Ok(Self(value))
    }

    /// Get the underlying value.
    pub fn value(&self) -> i32 {
        self.0
    }

    /// Merge another quantity into this one.
    ///
    /// There is no business upper bound; the sum saturates at the storage limit.
    pub fn merge(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}
