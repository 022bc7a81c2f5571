//! Checkout
//!
//! The snapshot the payment provider consumes: a derived line-item list and
//! the cart total, current as of the call. Serializes with the field names
//! the original order endpoint expected. Creating the payment session itself
//! is an external collaborator's job.

use serde::Serialize;

use crate::{
    cart::{Cart, CartLine},
    prices::Price,
};

/// One line of an order, derived from a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    /// Display name, including any size annotation.
    pub name: String,

    /// Unit price in minor units.
    #[serde(rename = "unitPrice")]
    pub unit_price: Price,

    /// Number of units.
    pub qty: u32,

    /// `unit_price * qty`.
    #[serde(rename = "lineTotal")]
    pub line_total: Price,
}

impl From<&CartLine> for LineItem {
    fn from(line: &CartLine) -> Self {
        LineItem {
            name: line.name.clone(),
            unit_price: line.price,
            qty: line.qty,
            line_total: line.line_total(),
        }
    }
}

/// An order snapshot: what the payment session is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSnapshot {
    /// Line items in cart order.
    pub items: Vec<LineItem>,

    /// Sum of line totals.
    pub total: Price,
}

impl OrderSnapshot {
    /// Derives a snapshot from the current cart contents.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        OrderSnapshot {
            items: cart.lines().map(LineItem::from).collect(),
            total: cart.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{cart::CartBook, store::Store};

    use super::*;

    #[test]
    fn snapshot_mirrors_the_cart() -> TestResult {
        let mut store = Store::in_memory();
        let mut book = CartBook::default();

        book.add_line(&mut store, "BYO", "Taro • Regular • T: Mochi x1", Price::new(725), Some("regular"));
        book.add_line(&mut store, "BYO", "Taro • Regular • T: Mochi x1", Price::new(725), Some("regular"));
        book.add_line(&mut store, "affogato-float", "Affogato Float", Price::new(625), None);

        let snapshot = OrderSnapshot::from_cart(book.cart());

        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.total, Price::new(2075));

        let byo = snapshot
            .items
            .iter()
            .find(|item| item.qty == 2)
            .ok_or("missing custom line")?;
        assert_eq!(byo.line_total, Price::new(1450));

        Ok(())
    }

    #[test]
    fn snapshot_serializes_with_original_field_names() -> TestResult {
        let mut store = Store::in_memory();
        let mut book = CartBook::default();

        book.add_line(&mut store, "ube-cheesecake-jar", "Ube Cheesecake Jar", Price::new(695), None);

        let value = serde_json::to_value(OrderSnapshot::from_cart(book.cart()))?;
        let first = value
            .get("items")
            .and_then(|items| items.get(0))
            .ok_or("missing first item")?;

        assert_eq!(first.get("unitPrice"), Some(&serde_json::json!(695)));
        assert_eq!(first.get("lineTotal"), Some(&serde_json::json!(695)));
        assert_eq!(value.get("total"), Some(&serde_json::json!(695)));

        Ok(())
    }
}
