//! Cart
//!
//! The cart is a mapping of merge key to line, persisted as one JSON blob
//! under a single storage key. [`CartBook`] is the aggregate that owns it:
//! every mutation persists synchronously before returning, and the persisted
//! state is authoritative immediately afterwards. Persistence is best-effort:
//! a failed write is logged and the in-memory view still updates, accepting
//! that the change may not survive a reload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    prices::Price,
    store::{StorageBackend, Store},
};

/// Storage key the serialized cart lives under.
pub const CART_KEY: &str = "site_cart_v1";

/// One cart line: a snapshot of a configuration at the time it was added.
///
/// `price` is the unit price captured at add time and is never re-derived
/// from the catalog. Invariant: `qty > 0`; a line that reaches zero is
/// deleted, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Merge key, `itemId::sizeOrDefault`.
    pub key: String,

    /// Catalog item id the line was created from.
    #[serde(rename = "itemId")]
    pub item_id: String,

    /// Display name, annotated with the size variant when present.
    pub name: String,

    /// Unit price snapshot.
    pub price: Price,

    /// Number of units.
    pub qty: u32,
}

impl CartLine {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }
}

/// The cart contents: merge key to line. Serializes as the original JSON
/// object blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<String, CartLine>,
}

impl Cart {
    /// Computes the merge key identifying identical configurations.
    #[must_use]
    pub fn merge_key(item_id: &str, size: Option<&str>) -> String {
        format!("{item_id}::{}", size.unwrap_or("default"))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Looks up a line by merge key.
    #[must_use]
    pub fn line(&self, key: &str) -> Option<&CartLine> {
        self.lines.get(key)
    }

    /// Iterates the lines in key order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Sum of `price * qty` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.values().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.values().map(|line| line.qty).sum()
    }
}

/// The cart aggregate: the single owner of the persisted cart blob.
#[derive(Debug, Default)]
pub struct CartBook {
    cart: Cart,
}

impl CartBook {
    /// Loads the cart from the store.
    ///
    /// A missing blob is an empty cart. A corrupt blob is also an empty cart:
    /// corruption self-heals on the next write instead of propagating.
    #[must_use]
    pub fn load<B: StorageBackend>(store: &Store<B>) -> Self {
        let cart = match store.get(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(cart) => cart,
                Err(err) => {
                    warn!(%err, "corrupt cart blob; starting from an empty cart");

                    Cart::default()
                }
            },
            Ok(None) => Cart::default(),
            Err(err) => {
                warn!(%err, "cart blob unreadable; starting from an empty cart");

                Cart::default()
            }
        };

        CartBook { cart }
    }

    /// Re-reads the persisted cart, discarding the in-memory view.
    ///
    /// This is the resync hook for external storage-change notifications
    /// (another tab wrote the blob). It is an optional signal, not strong
    /// consistency.
    pub fn reload<B: StorageBackend>(&mut self, store: &Store<B>) {
        *self = Self::load(store);
    }

    /// The current cart contents.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of `price * qty` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.cart.count()
    }

    /// Adds one unit of the given configuration.
    ///
    /// If a line with the same merge key exists its quantity increments and
    /// the original name/price snapshot is kept; otherwise a new line is
    /// created at quantity 1. Availability is the caller's concern: the shop
    /// front checks it once at the UI boundary before calling this.
    pub fn add_line<B: StorageBackend>(
        &mut self,
        store: &mut Store<B>,
        item_id: &str,
        name: &str,
        price: Price,
        size: Option<&str>,
    ) {
        let key = Cart::merge_key(item_id, size);
        let display_name = match size {
            Some(size) => format!("{name} ({size})"),
            None => name.to_string(),
        };

        let line = self
            .cart
            .lines
            .entry(key.clone())
            .or_insert_with(|| CartLine {
                key,
                item_id: item_id.to_string(),
                name: display_name,
                price,
                qty: 0,
            });
        line.qty = line.qty.saturating_add(1);

        self.persist(store);
    }

    /// Deletes a line unconditionally. No-op if the key is absent.
    pub fn remove_line<B: StorageBackend>(&mut self, store: &mut Store<B>, key: &str) {
        if self.cart.lines.remove(key).is_none() {
            return;
        }

        self.persist(store);
    }

    /// Adds `delta` to a line's quantity; a result of zero or less deletes
    /// the line. No-op if the key is absent.
    pub fn change_qty<B: StorageBackend>(&mut self, store: &mut Store<B>, key: &str, delta: i32) {
        let Some(line) = self.cart.lines.get_mut(key) else {
            return;
        };

        let next = i64::from(line.qty) + i64::from(delta);
        if next <= 0 {
            self.cart.lines.remove(key);
        } else {
            line.qty = u32::try_from(next).unwrap_or(u32::MAX);
        }

        self.persist(store);
    }

    /// Deletes the entire persisted cart.
    pub fn clear<B: StorageBackend>(&mut self, store: &mut Store<B>) {
        self.cart = Cart::default();

        if let Err(err) = store.remove(CART_KEY) {
            warn!(%err, "cart blob not removed; in-memory cart cleared anyway");
        }
    }

    fn persist<B: StorageBackend>(&self, store: &mut Store<B>) {
        let blob = match serde_json::to_string(&self.cart) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(%err, "cart failed to serialize; keeping in-memory view");
                return;
            }
        };

        if let Err(err) = store.set(CART_KEY, &blob) {
            warn!(%err, "cart not persisted; keeping in-memory view");
        }
    }
}
