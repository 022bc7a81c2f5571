//! Availability overlay
//!
//! Per-item out-of-stock flags, persisted separately from the cart. The
//! representation is deliberately sparse: only explicit `false` entries are
//! stored, and absence means available. Marking an item available deletes its
//! entry rather than storing `true`, and load prunes any entry whose value is
//! not exactly `false` (stale data from earlier format drift).

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::warn;

use crate::store::{StorageBackend, Store};

/// Storage key the availability blob lives under.
pub const AVAILABILITY_KEY: &str = "itemAvailability";

/// The out-of-stock overlay. Gates "add to cart" at the catalog boundary;
/// has no interaction with pricing.
#[derive(Debug, Default)]
pub struct Availability {
    out_of_stock: BTreeSet<String>,
}

impl Availability {
    /// Loads the overlay, pruning stale entries and persisting the cleaned
    /// map back. A missing or corrupt blob loads as "everything available".
    #[must_use]
    pub fn load<B: StorageBackend>(store: &mut Store<B>) -> Self {
        let stored: BTreeMap<String, Value> = match store.get(AVAILABILITY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(stored) => stored,
                Err(err) => {
                    warn!(%err, "corrupt availability blob; treating all items as available");

                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                warn!(%err, "availability blob unreadable; treating all items as available");

                BTreeMap::new()
            }
        };

        // Anything that is not exactly `false` is stale and gets dropped.
        let out_of_stock = stored
            .into_iter()
            .filter(|(_, value)| *value == Value::Bool(false))
            .map(|(id, _)| id)
            .collect();

        let overlay = Availability { out_of_stock };
        overlay.persist(store);

        overlay
    }

    /// Whether an item may be added to the cart. True unless an explicit
    /// out-of-stock flag is stored.
    #[must_use]
    pub fn is_available(&self, item_id: &str) -> bool {
        !self.out_of_stock.contains(item_id)
    }

    /// Ids currently flagged out of stock.
    pub fn out_of_stock(&self) -> impl Iterator<Item = &str> {
        self.out_of_stock.iter().map(String::as_str)
    }

    /// Flags an item out of stock.
    pub fn set_unavailable<B: StorageBackend>(&mut self, store: &mut Store<B>, item_id: &str) {
        if self.out_of_stock.insert(item_id.to_string()) {
            self.persist(store);
        }
    }

    /// Clears an item's flag, making it available again. Deletes the entry to
    /// keep the stored map sparse.
    pub fn set_available<B: StorageBackend>(&mut self, store: &mut Store<B>, item_id: &str) {
        if self.out_of_stock.remove(item_id) {
            self.persist(store);
        }
    }

    fn persist<B: StorageBackend>(&self, store: &mut Store<B>) {
        let map: BTreeMap<&str, bool> = self
            .out_of_stock
            .iter()
            .map(|id| (id.as_str(), false))
            .collect();

        let blob = match serde_json::to_string(&map) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(%err, "availability failed to serialize; keeping in-memory view");
                return;
            }
        };

        if let Err(err) = store.set(AVAILABILITY_KEY, &blob) {
            warn!(%err, "availability not persisted; keeping in-memory view");
        }
    }
}
