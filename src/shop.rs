//! Shop front
//!
//! The UI-boundary facade wiring the store, the cart aggregate and the
//! availability overlay together. This is where the availability gate lives:
//! out-of-stock items are rejected here, once, rather than re-checked inside
//! the cart aggregate.

use thiserror::Error;

use crate::{
    availability::Availability,
    cart::{Cart, CartBook},
    catalog::Catalog,
    checkout::OrderSnapshot,
    prices::Price,
    store::{FileBackend, MemoryBackend, StorageBackend, Store},
};

/// Errors raised at the shop boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    /// The id (and size variant) matches no premade menu item.
    #[error("unknown menu item: {0}")]
    UnknownItem(String),

    /// The item is flagged out of stock.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// Checkout was requested with nothing in the cart.
    #[error("your cart is empty")]
    EmptyCart,
}

/// The storefront: owns the store and the state persisted through it.
#[derive(Debug)]
pub struct Shop<B: StorageBackend = FileBackend> {
    store: Store<B>,
    cart: CartBook,
    availability: Availability,
}

impl Shop<MemoryBackend> {
    /// A shop over transient storage, for tests and demos.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(Store::in_memory())
    }
}

impl<B: StorageBackend> Shop<B> {
    /// Opens the shop over a durable backend, probing it and loading the
    /// persisted cart and availability state.
    #[must_use]
    pub fn open(backend: B) -> Self {
        Self::from_store(Store::open(backend))
    }

    fn from_store(mut store: Store<B>) -> Self {
        let availability = Availability::load(&mut store);
        let cart = CartBook::load(&store);

        Shop {
            store,
            cart,
            availability,
        }
    }

    /// Whether cart and availability writes are reaching durable storage.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        self.store.is_durable()
    }

    /// Adds one unit of a premade menu item to the cart.
    ///
    /// This is the single point of truth for the availability gate on
    /// catalog adds.
    ///
    /// # Errors
    ///
    /// - [`ShopError::UnknownItem`] if the id/size matches no menu item.
    /// - [`ShopError::OutOfStock`] if the item is flagged unavailable.
    pub fn add_to_cart(
        &mut self,
        catalog: &Catalog,
        item_id: &str,
        size: Option<&str>,
    ) -> Result<(), ShopError> {
        let item = catalog
            .menu_item(item_id, size)
            .ok_or_else(|| ShopError::UnknownItem(item_id.to_string()))?;

        if !self.availability.is_available(&item.id) {
            return Err(ShopError::OutOfStock(item.name.clone()));
        }

        self.cart.add_line(
            &mut self.store,
            &item.id,
            &item.name,
            item.price,
            item.size.as_deref(),
        );

        Ok(())
    }

    /// Adds one unit of a committed custom cup, carted under the shared
    /// build-your-own item id with the size as the merge-key variant.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::OutOfStock`] if custom cups are flagged
    /// unavailable.
    pub fn add_custom(
        &mut self,
        label: &str,
        unit_price: Price,
        size_id: &str,
    ) -> Result<(), ShopError> {
        let item_id = crate::session::CUSTOM_ITEM_ID;

        if !self.availability.is_available(item_id) {
            return Err(ShopError::OutOfStock("custom cups".to_string()));
        }

        self.cart
            .add_line(&mut self.store, item_id, label, unit_price, Some(size_id));

        Ok(())
    }

    /// The current cart contents.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    /// Sum of `price * qty` over all cart lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Sum of quantities over all cart lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.cart.count()
    }

    /// Deletes a cart line unconditionally.
    pub fn remove_line(&mut self, key: &str) {
        self.cart.remove_line(&mut self.store, key);
    }

    /// Adjusts a cart line's quantity; zero or less deletes the line.
    pub fn change_qty(&mut self, key: &str, delta: i32) {
        self.cart.change_qty(&mut self.store, key, delta);
    }

    /// Deletes the entire cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear(&mut self.store);
    }

    /// Whether an item may currently be added to the cart.
    #[must_use]
    pub fn is_available(&self, item_id: &str) -> bool {
        self.availability.is_available(item_id)
    }

    /// Flags an item out of stock.
    pub fn set_unavailable(&mut self, item_id: &str) {
        self.availability.set_unavailable(&mut self.store, item_id);
    }

    /// Clears an item's out-of-stock flag.
    pub fn set_available(&mut self, item_id: &str) {
        self.availability.set_available(&mut self.store, item_id);
    }

    /// Re-reads persisted state, picking up writes made through other handles
    /// on the same storage (the cross-tab resync signal).
    pub fn resync(&mut self) {
        self.cart.reload(&self.store);
        self.availability = Availability::load(&mut self.store);
    }

    /// Snapshot of the cart for the payment provider.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::EmptyCart`] if there is nothing to check out.
    pub fn checkout(&self) -> Result<OrderSnapshot, ShopError> {
        if self.cart().is_empty() {
            return Err(ShopError::EmptyCart);
        }

        Ok(OrderSnapshot::from_cart(self.cart()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::fixtures;

    use super::*;

    #[test]
    fn add_to_cart_looks_up_the_menu() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut shop = Shop::in_memory();

        shop.add_to_cart(&catalog, "mango-sticky-rice", None)?;
        shop.add_to_cart(&catalog, "classic-sundae", Some("small"))?;

        assert_eq!(shop.count(), 2);
        assert_eq!(shop.total(), Price::new(675 + 550));

        let line = shop.cart().line("classic-sundae::small");
        assert_eq!(
            line.map(|line| line.name.as_str()),
            Some("Classic Sundae (small)")
        );

        Ok(())
    }

    #[test]
    fn add_to_cart_rejects_unknown_items() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut shop = Shop::in_memory();

        assert_eq!(
            shop.add_to_cart(&catalog, "banana-split", None).err(),
            Some(ShopError::UnknownItem("banana-split".to_string()))
        );

        Ok(())
    }

    #[test]
    fn out_of_stock_items_cannot_be_added() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut shop = Shop::in_memory();

        shop.set_unavailable("mango-sticky-rice");

        assert_eq!(
            shop.add_to_cart(&catalog, "mango-sticky-rice", None).err(),
            Some(ShopError::OutOfStock("Mango Sticky Rice".to_string()))
        );
        assert!(shop.cart().is_empty());

        shop.set_available("mango-sticky-rice");
        shop.add_to_cart(&catalog, "mango-sticky-rice", None)?;

        assert_eq!(shop.count(), 1);

        Ok(())
    }

    #[test]
    fn checkout_rejects_an_empty_cart() {
        let shop = Shop::in_memory();

        assert_eq!(shop.checkout().err(), Some(ShopError::EmptyCart));
    }
}
