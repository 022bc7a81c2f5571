//! Customization session
//!
//! The transient state of one in-progress build-your-own configuration.
//! Opening a session on a base flavor resets everything to defaults; a
//! successful [`Session::commit`] resets it back to defaults for the next
//! cup, and cancelling is simply dropping it. Sessions are never persisted.
//!
//! The session is the mutation boundary for the selection cap: every
//! mutator that could grow the effective selection validates against the
//! cap before applying, and commit re-validates the whole state in case any
//! path bypassed the per-step checks. A cap rejection anywhere leaves the
//! configuration exactly as it was.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    catalog::{Catalog, Flavor, OptionKind, SizeTier},
    pricing::{self, Quote},
    shop::{Shop, ShopError},
    store::StorageBackend,
};

/// Item id custom cups are carted under; all configurations of the same size
/// share a merge key.
pub const CUSTOM_ITEM_ID: &str = "BYO";

/// Errors raised by session mutators and commit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The requested base flavor is not in the catalog.
    #[error("unknown flavor: {0}")]
    UnknownFlavor(String),

    /// The requested size tier is not in the catalog.
    #[error("unknown size: {0}")]
    UnknownSize(String),

    /// The requested option id is not in the catalog.
    #[error("unknown {0}: {1}")]
    UnknownOption(OptionKind, String),

    /// The change would push the selection past the hard cap. The message is
    /// shown to the customer; the session state is unchanged.
    #[error(
        "for a {size} cup, you may choose up to {max_extras} extra items \
         beyond the included {included} (extras are $0.50 each)"
    )]
    CapExceeded {
        /// Tier label, for the message.
        size: String,

        /// The tier's included allowance.
        included: u32,

        /// Chargeable extras admitted past the allowance.
        max_extras: u32,
    },

    /// Commit was rejected at the cart boundary.
    #[error(transparent)]
    Shop(#[from] ShopError),
}

/// An open customization session. Borrows the catalog it was opened against.
#[derive(Debug)]
pub struct Session<'a> {
    catalog: &'a Catalog,
    flavor: &'a Flavor,
    size: &'a SizeTier,
    toppings: FxHashMap<String, u32>,
    mix_ins: FxHashMap<String, u32>,
    cups: u32,
    notes: String,
}

impl<'a> Session<'a> {
    /// Opens a session on a base flavor with everything at defaults: the
    /// catalog's default size, every known option at quantity zero (no
    /// partial maps), one cup, empty notes.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownFlavor`] if the flavor id is not cataloged.
    /// - [`SessionError::UnknownSize`] if the catalog's default size is
    ///   missing (only possible with a hand-built catalog).
    pub fn open(catalog: &'a Catalog, flavor_id: &str) -> Result<Self, SessionError> {
        let flavor = catalog
            .flavor(flavor_id)
            .ok_or_else(|| SessionError::UnknownFlavor(flavor_id.to_string()))?;

        let default_size = catalog.default_size_id();
        let size = catalog
            .size(default_size)
            .ok_or_else(|| SessionError::UnknownSize(default_size.to_string()))?;

        Ok(Session {
            catalog,
            flavor,
            size,
            toppings: zeroed(catalog, OptionKind::Topping),
            mix_ins: zeroed(catalog, OptionKind::MixIn),
            cups: 1,
            notes: String::new(),
        })
    }

    /// The catalog this session was opened against.
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// The selected base flavor.
    #[must_use]
    pub fn flavor(&self) -> &'a Flavor {
        self.flavor
    }

    /// The selected size tier.
    #[must_use]
    pub fn size(&self) -> &'a SizeTier {
        self.size
    }

    /// Number of cups this configuration will be added as.
    #[must_use]
    pub fn cups(&self) -> u32 {
        self.cups
    }

    /// Free-text notes, trimmed.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Current quantity of an option; zero for unknown ids.
    #[must_use]
    pub fn option_qty(&self, kind: OptionKind, option_id: &str) -> u32 {
        self.quantities(kind).get(option_id).copied().unwrap_or(0)
    }

    /// Sum of all topping quantities.
    #[must_use]
    pub fn topping_count(&self) -> u32 {
        self.toppings.values().sum()
    }

    /// Sum of all mix-in quantities.
    #[must_use]
    pub fn mix_count(&self) -> u32 {
        self.mix_ins.values().sum()
    }

    /// Total selected add-ons across both kinds.
    #[must_use]
    pub fn total_selected(&self) -> u32 {
        self.topping_count() + self.mix_count()
    }

    /// Selects a size tier. Selections and quantities are kept, so a
    /// downgrade is validated against the new tier's cap first; on rejection
    /// the size and selections are unchanged.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownSize`] if the tier id is not cataloged.
    /// - [`SessionError::CapExceeded`] if the kept selections would exceed
    ///   the new tier's cap.
    pub fn set_size(&mut self, size_id: &str) -> Result<(), SessionError> {
        let size = self
            .catalog
            .size(size_id)
            .ok_or_else(|| SessionError::UnknownSize(size_id.to_string()))?;

        if self.total_selected() > pricing::selection_cap(size) {
            return Err(Self::cap_exceeded_for(size));
        }

        self.size = size;

        Ok(())
    }

    /// Applies `delta` to one option's quantity, clamped at zero below.
    ///
    /// The hypothetical total after the change is validated against the
    /// selection cap first; on rejection nothing changes. This is the sole
    /// gate preventing unbounded selection.
    ///
    /// # Errors
    ///
    /// - [`SessionError::UnknownOption`] if the id is not cataloged.
    /// - [`SessionError::CapExceeded`] if the change would exceed the cap.
    pub fn adjust_option(
        &mut self,
        kind: OptionKind,
        option_id: &str,
        delta: i32,
    ) -> Result<u32, SessionError> {
        if !self.quantities(kind).contains_key(option_id) {
            return Err(SessionError::UnknownOption(kind, option_id.to_string()));
        }

        let current = self.option_qty(kind, option_id);
        let next = u32::try_from(i64::from(current) + i64::from(delta)).unwrap_or(0);

        let hypothetical = self.total_selected() - current + next;
        if hypothetical > pricing::selection_cap(self.size) {
            return Err(self.cap_exceeded());
        }

        self.quantities_mut(kind).insert(option_id.to_string(), next);

        Ok(next)
    }

    /// Sets how many cups the commit will add. Clamped to at least one.
    pub fn set_cups(&mut self, cups: u32) {
        self.cups = cups.max(1);
    }

    /// Sets the free-text notes, trimming surrounding whitespace.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.trim().to_string();
    }

    /// Prices the current configuration.
    #[must_use]
    pub fn quote(&self) -> Quote {
        pricing::quote(self)
    }

    /// Commits the configuration to the cart.
    ///
    /// Re-validates the full state against the selection cap, prices it, then
    /// adds one cart line unit per cup. The per-cup loop (rather than a
    /// single add with a quantity) matches the original commit behavior and
    /// keeps merge-key accounting identical to repeated single adds.
    ///
    /// On success the selections, cup count, and notes reset for the next
    /// cup (the flavor and size stay chosen). On rejection the configuration
    /// is untouched, so the customer can trim a selection and retry.
    ///
    /// # Errors
    ///
    /// - [`SessionError::CapExceeded`] if the selection exceeds the cap.
    /// - [`SessionError::Shop`] if custom cups are flagged out of stock.
    pub fn commit<B: StorageBackend>(&mut self, shop: &mut Shop<B>) -> Result<Quote, SessionError> {
        if self.total_selected() > pricing::selection_cap(self.size) {
            return Err(self.cap_exceeded());
        }

        let quote = pricing::quote(self);

        for _ in 0..self.cups {
            shop.add_custom(&quote.label, quote.unit_price, &self.size.id)?;
        }

        self.toppings = zeroed(self.catalog, OptionKind::Topping);
        self.mix_ins = zeroed(self.catalog, OptionKind::MixIn);
        self.cups = 1;
        self.notes.clear();

        Ok(quote)
    }

    fn quantities(&self, kind: OptionKind) -> &FxHashMap<String, u32> {
        match kind {
            OptionKind::Topping => &self.toppings,
            OptionKind::MixIn => &self.mix_ins,
        }
    }

    fn quantities_mut(&mut self, kind: OptionKind) -> &mut FxHashMap<String, u32> {
        match kind {
            OptionKind::Topping => &mut self.toppings,
            OptionKind::MixIn => &mut self.mix_ins,
        }
    }

    fn cap_exceeded(&self) -> SessionError {
        Self::cap_exceeded_for(self.size)
    }

    fn cap_exceeded_for(size: &SizeTier) -> SessionError {
        SessionError::CapExceeded {
            size: size.label.clone(),
            included: size.included_capacity,
            max_extras: pricing::MAX_CHARGEABLE_EXTRAS,
        }
    }

    /// Sets an option quantity without cap validation. Exists so tests can
    /// exercise the defense-in-depth checks downstream of the gate.
    #[cfg(test)]
    pub(crate) fn force_option_qty(&mut self, kind: OptionKind, option_id: &str, qty: u32) {
        self.quantities_mut(kind).insert(option_id.to_string(), qty);
    }
}

fn zeroed(catalog: &Catalog, kind: OptionKind) -> FxHashMap<String, u32> {
    catalog
        .options(kind)
        .iter()
        .map(|option| (option.id.clone(), 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{fixtures, prices::Price, shop::Shop};

    use super::*;

    #[test]
    fn open_resets_to_defaults() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let session = Session::open(&catalog, "green-tea")?;

        assert_eq!(session.size().id, "regular");
        assert_eq!(session.cups(), 1);
        assert_eq!(session.total_selected(), 0);
        assert_eq!(session.notes(), "");

        // No partial maps: every cataloged option has an entry.
        assert_eq!(
            session.toppings.len(),
            catalog.options(OptionKind::Topping).len()
        );
        assert_eq!(session.mix_ins.len(), catalog.options(OptionKind::MixIn).len());

        Ok(())
    }

    #[test]
    fn open_rejects_unknown_flavor() -> TestResult {
        let catalog = fixtures::dessert_shop()?;

        assert_eq!(
            Session::open(&catalog, "pistachio").err(),
            Some(SessionError::UnknownFlavor("pistachio".to_string()))
        );

        Ok(())
    }

    #[test]
    fn adjust_option_rejects_unknown_id() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;

        assert_eq!(
            session.adjust_option(OptionKind::MixIn, "gravel", 1).err(),
            Some(SessionError::UnknownOption(
                OptionKind::MixIn,
                "gravel".to_string()
            ))
        );

        Ok(())
    }

    #[test]
    fn selection_at_exactly_the_cap_succeeds() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;

        // Regular: 4 included + 2 extras = 6.
        session.adjust_option(OptionKind::Topping, "oreo", 4)?;
        session.adjust_option(OptionKind::MixIn, "nutella", 2)?;

        assert_eq!(session.total_selected(), 6);

        Ok(())
    }

    #[test]
    fn selection_past_the_cap_is_rejected_without_state_change() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;

        session.adjust_option(OptionKind::Topping, "oreo", 4)?;
        session.adjust_option(OptionKind::MixIn, "nutella", 2)?;

        let err = session.adjust_option(OptionKind::Topping, "mochi", 1);

        assert!(matches!(err, Err(SessionError::CapExceeded { .. })));
        assert_eq!(session.total_selected(), 6);
        assert_eq!(session.option_qty(OptionKind::Topping, "mochi"), 0);

        Ok(())
    }

    #[test]
    fn small_tier_rejects_sixth_item() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "mango")?;
        session.set_size("small")?;

        // Small: 3 included + 2 extras = 5.
        session.adjust_option(OptionKind::Topping, "oreo", 2)?;
        session.adjust_option(OptionKind::MixIn, "lychee", 3)?;

        let err = session.adjust_option(OptionKind::MixIn, "peach", 1);

        assert!(matches!(err, Err(SessionError::CapExceeded { .. })));

        Ok(())
    }

    #[test]
    fn decrement_clamps_at_zero() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;

        session.adjust_option(OptionKind::Topping, "oreo", 1)?;
        let qty = session.adjust_option(OptionKind::Topping, "oreo", -5)?;

        assert_eq!(qty, 0);

        Ok(())
    }

    #[test]
    fn set_cups_clamps_to_one() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;

        session.set_cups(0);

        assert_eq!(session.cups(), 1);

        Ok(())
    }

    #[test]
    fn commit_adds_one_line_per_cup_under_one_merge_key() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut shop = Shop::in_memory();
        let mut session = Session::open(&catalog, "original")?;

        session.adjust_option(OptionKind::Topping, "oreo", 2)?;
        session.set_cups(3);

        let quote = session.commit(&mut shop)?;

        assert_eq!(quote.unit_price, Price::new(725));

        let line = shop.cart().line("BYO::regular").cloned();
        assert_eq!(line.as_ref().map(|line| line.qty), Some(3));
        assert_eq!(shop.total(), Price::new(2175));

        Ok(())
    }

    #[test]
    fn commit_revalidates_the_cap() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut shop = Shop::in_memory();
        let mut session = Session::open(&catalog, "original")?;

        session.force_option_qty(OptionKind::Topping, "oreo", 7);

        let err = session.commit(&mut shop);

        assert!(matches!(err, Err(SessionError::CapExceeded { .. })));
        assert!(shop.cart().is_empty());

        // The rejection left the configuration intact; trimming it down
        // makes the same session committable.
        assert_eq!(session.option_qty(OptionKind::Topping, "oreo"), 7);
        session.adjust_option(OptionKind::Topping, "oreo", -1)?;
        session.commit(&mut shop)?;

        assert_eq!(shop.count(), 1);

        Ok(())
    }

    #[test]
    fn size_downgrade_past_the_cap_is_rejected_without_state_change() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut shop = Shop::in_memory();
        let mut session = Session::open(&catalog, "original")?;

        // Regular holds 6; small only 5.
        session.adjust_option(OptionKind::Topping, "oreo", 6)?;

        let err = session.set_size("small");

        assert!(matches!(err, Err(SessionError::CapExceeded { .. })));
        assert_eq!(session.size().id, "regular");
        assert_eq!(session.total_selected(), 6);

        // Still a valid regular configuration.
        session.commit(&mut shop)?;
        assert_eq!(shop.count(), 1);

        Ok(())
    }

    #[test]
    fn size_downgrade_within_the_cap_keeps_selections() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;

        session.adjust_option(OptionKind::Topping, "oreo", 5)?;
        session.set_size("small")?;

        assert_eq!(session.size().id, "small");
        assert_eq!(session.total_selected(), 5);

        Ok(())
    }

    #[test]
    fn successful_commit_resets_the_builder() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut shop = Shop::in_memory();
        let mut session = Session::open(&catalog, "original")?;

        session.adjust_option(OptionKind::MixIn, "nutella", 2)?;
        session.set_cups(3);
        session.set_notes("less ice");

        session.commit(&mut shop)?;

        assert_eq!(session.total_selected(), 0);
        assert_eq!(session.cups(), 1);
        assert_eq!(session.notes(), "");

        Ok(())
    }

    #[test]
    fn commit_respects_the_availability_gate() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut shop = Shop::in_memory();
        shop.set_unavailable(CUSTOM_ITEM_ID);

        let mut session = Session::open(&catalog, "original")?;
        let err = session.commit(&mut shop);

        assert!(matches!(
            err,
            Err(SessionError::Shop(ShopError::OutOfStock(_)))
        ));
        assert!(shop.cart().is_empty());

        Ok(())
    }
}
