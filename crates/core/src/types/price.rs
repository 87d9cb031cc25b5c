//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] in memory but serialized as plain JSON
//! numbers, which is the shape carts persisted by the mobile app already use
//! (`"price": 10`). Currency and tax handling live outside the cart.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price {0:?}: not a decimal number")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A unit price in the storefront's currency.
///
/// ## Examples
///
/// ```
/// use marketplace_core::Price;
///
/// let price: Price = "19.99".parse().unwrap();
/// assert_eq!(price, Price::from_cents(1999));
/// assert_eq!(price.to_string(), "19.99");
///
/// assert!("-1".parse::<Price>().is_err());
/// assert!("ten".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in the smallest currency unit.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Wrap `amount`, rejecting anything below zero.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for negative amounts. Negative zero is
    /// accepted as zero.
    pub fn try_new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::try_new(amount)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::try_new(amount).map_err(serde::de::Error::custom)
    }
}
