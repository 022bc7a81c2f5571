//! Pricing
//!
//! The customization pricing engine: a pure total function from a session
//! snapshot to a unit price and a human-readable order label. It never
//! rejects input, even technically over-cap selections; enforcing the
//! selection cap is the session's job at the mutation boundary.

use crate::{
    catalog::{OptionKind, SizeTier},
    prices::Price,
    session::Session,
};

/// Selected add-ons beyond the included allowance are charged per item, but
/// only up to this many; the selection cap rejects anything further.
pub const MAX_CHARGEABLE_EXTRAS: u32 = 2;

/// Surcharge per chargeable extra.
pub const EXTRA_UNIT_PRICE: Price = Price::new(50);

/// The most add-ons a tier admits: its included allowance plus the
/// chargeable extras. Selections beyond this are rejected, not charged.
#[must_use]
pub fn selection_cap(tier: &SizeTier) -> u32 {
    tier.included_capacity + MAX_CHARGEABLE_EXTRAS
}

/// A priced customization: the unit price and the label that describes the
/// order downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Unit price for one cup of this configuration.
    pub unit_price: Price,

    /// Order label: base, size, selections in catalog order, notes.
    pub label: String,
}

/// Prices a session snapshot.
///
/// `overage = max(0, total_selected - included_capacity)`, capped at
/// [`MAX_CHARGEABLE_EXTRAS`]; the unit price is the tier base price plus the
/// chargeable overage at [`EXTRA_UNIT_PRICE`] each. All arithmetic is in
/// whole cents, so no rounding step is needed.
#[must_use]
pub fn quote(session: &Session<'_>) -> Quote {
    let tier = session.size();

    let overage = session
        .total_selected()
        .saturating_sub(tier.included_capacity);
    let chargeable = overage.min(MAX_CHARGEABLE_EXTRAS);

    Quote {
        unit_price: tier.base_price.plus(EXTRA_UNIT_PRICE.times(chargeable)),
        label: label(session),
    }
}

/// Builds the order label. Selections are listed in catalog declaration
/// order, which keeps labels stable for identical configurations.
fn label(session: &Session<'_>) -> String {
    let mut label = format!("{} • {}", session.flavor().name, session.size().label);

    let toppings = segment(session, OptionKind::Topping);
    if !toppings.is_empty() {
        label.push_str(" • T: ");
        label.push_str(&toppings);
    }

    let mix_ins = segment(session, OptionKind::MixIn);
    if !mix_ins.is_empty() {
        label.push_str(" • M: ");
        label.push_str(&mix_ins);
    }

    if !session.notes().is_empty() {
        label.push_str(" • notes: ");
        label.push_str(session.notes());
    }

    label
}

fn segment(session: &Session<'_>, kind: OptionKind) -> String {
    session
        .catalog()
        .options(kind)
        .iter()
        .filter_map(|option| {
            let qty = session.option_qty(kind, &option.id);

            (qty > 0).then(|| format!("{} x{qty}", option.name))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::fixtures;

    use super::*;

    #[test]
    fn included_selection_prices_at_base() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;

        session.adjust_option(OptionKind::Topping, "oreo", 2)?;
        session.adjust_option(OptionKind::MixIn, "strawberry", 2)?;

        assert_eq!(quote(&session).unit_price, Price::new(725));

        Ok(())
    }

    #[test]
    fn regular_with_one_extra_charges_fifty_cents() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;

        // 3 toppings + 2 mix-ins = 5 selected against an allowance of 4.
        session.adjust_option(OptionKind::Topping, "oreo", 2)?;
        session.adjust_option(OptionKind::Topping, "mochi", 1)?;
        session.adjust_option(OptionKind::MixIn, "strawberry", 2)?;

        assert_eq!(quote(&session).unit_price, Price::new(775));

        Ok(())
    }

    #[test]
    fn small_with_two_extras_charges_one_dollar() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "mango")?;
        session.set_size("small")?;

        // 2 toppings + 3 mix-ins = 5 selected against an allowance of 3.
        session.adjust_option(OptionKind::Topping, "oreo", 2)?;
        session.adjust_option(OptionKind::MixIn, "lychee", 3)?;

        assert_eq!(quote(&session).unit_price, Price::new(625));

        Ok(())
    }

    #[test]
    fn quote_is_total_even_over_cap() -> TestResult {
        // The pricing function assumes validated input but still prices
        // over-cap selections, capping the surcharge at two extras.
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "original")?;
        session.force_option_qty(OptionKind::Topping, "oreo", 40);

        assert_eq!(quote(&session).unit_price, Price::new(825));

        Ok(())
    }

    #[test]
    fn label_lists_selections_in_catalog_order() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let mut session = Session::open(&catalog, "taro")?;

        // Added out of catalog order on purpose.
        session.adjust_option(OptionKind::Topping, "mochi", 1)?;
        session.adjust_option(OptionKind::Topping, "almonds", 2)?;
        session.adjust_option(OptionKind::MixIn, "condensed-milk", 1)?;
        session.set_notes("  light sauce  ");

        assert_eq!(
            quote(&session).label,
            "Taro • Regular • T: Almonds x2, Mochi x1 • M: Condensed Milk x1 • notes: light sauce"
        );

        Ok(())
    }

    #[test]
    fn label_omits_empty_segments() -> TestResult {
        let catalog = fixtures::dessert_shop()?;
        let session = Session::open(&catalog, "coffee")?;

        assert_eq!(quote(&session).label, "Coffee • Regular");

        Ok(())
    }
}
