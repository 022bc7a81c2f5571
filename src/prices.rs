//! Prices
//!
//! All monetary values in the crate are integer minor units (cents). Base
//! prices and the extras surcharge are whole-cent amounts, so every derived
//! price is exact and no floating-point rounding step is needed.

use std::{fmt, iter::Sum, ops::Deref};

use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};

/// A price in minor units (cents).
///
/// Serializes as a plain JSON number, matching the persisted cart blob format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    value: i64,
}

impl Price {
    /// Creates a new price from minor units.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Price { value }
    }

    /// The zero price.
    #[must_use]
    pub const fn zero() -> Self {
        Price { value: 0 }
    }

    /// Adds two prices.
    #[must_use]
    pub const fn plus(self, other: Price) -> Self {
        Price {
            value: self.value.saturating_add(other.value),
        }
    }

    /// Multiplies the price by a quantity.
    #[must_use]
    pub fn times(self, qty: u32) -> Self {
        Price {
            value: self.value.saturating_mul(i64::from(qty)),
        }
    }

    /// The price as [`Money`], for display.
    #[must_use]
    pub fn money(self) -> Money<'static, iso::Currency> {
        Money::from_minor(self.value, iso::USD)
    }
}

impl Deref for Price {
    type Target = i64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.money())
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::zero(), Price::plus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_price() {
        let price = Price::new(725);

        assert_eq!(*price, 725);
    }

    #[test]
    fn plus_and_times() {
        let unit = Price::new(725).plus(Price::new(50).times(2));

        assert_eq!(unit, Price::new(825));
    }

    #[test]
    fn sum_of_prices() {
        let total: Price = [Price::new(100), Price::new(250)].into_iter().sum();

        assert_eq!(total, Price::new(350));
    }

    #[test]
    fn displays_as_dollars() {
        assert_eq!(Price::new(775).to_string(), "$7.75");
    }
}
