//! Catalog
//!
//! Static storefront configuration: base flavors for build-your-own cups,
//! size tiers, customization options and the premade menu. Loaded once and
//! treated as read-only; declaration order is preserved because order labels
//! list selections in catalog order.

use std::fmt;

use thiserror::Error;

use crate::prices::Price;

/// Errors raised while assembling a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Two entries in the same list share an id.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),

    /// The catalog has no size tiers.
    #[error("catalog has no size tiers")]
    NoSizes,

    /// The configured default size tier does not exist.
    #[error("unknown default size tier: {0}")]
    UnknownDefaultSize(String),
}

/// A base flavor that can be customized into a cup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flavor {
    /// Stable flavor id (e.g. `original`).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Display copy shown on the flavor card.
    pub description: String,
}

/// Which kind of customization option an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// A topping, added on top of the cup.
    Topping,

    /// A mix-in, folded into the base.
    MixIn,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Topping => f.write_str("topping"),
            OptionKind::MixIn => f.write_str("mix-in"),
        }
    }
}

/// A topping or mix-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomOption {
    /// Stable option id, derived from the display name.
    pub id: String,

    /// Display name.
    pub name: String,
}

impl CustomOption {
    /// Creates an option with an id derived from the display name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        CustomOption {
            id: slug(name),
            name: name.to_string(),
        }
    }
}

/// A priced capacity bucket for build-your-own cups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeTier {
    /// Stable tier id (e.g. `regular`).
    pub id: String,

    /// Display label (e.g. `Regular`).
    pub label: String,

    /// Base price covering the included allowance.
    pub base_price: Price,

    /// How many toppings plus mix-ins are included in the base price.
    pub included_capacity: u32,

    /// Example combinations shown to the customer. Display copy only; pricing
    /// uses the total selection count.
    pub combos: Vec<String>,
}

/// A premade menu item that can be added to the cart directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Stable item id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: Price,

    /// Optional size variant. Items without variants use the default merge key.
    pub size: Option<String>,
}

/// The full storefront catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    flavors: Vec<Flavor>,
    sizes: Vec<SizeTier>,
    toppings: Vec<CustomOption>,
    mix_ins: Vec<CustomOption>,
    menu: Vec<MenuItem>,
    default_size: String,
}

impl Catalog {
    /// Assembles a catalog, validating id uniqueness and the default size.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NoSizes`] if no size tiers were provided.
    /// - [`CatalogError::UnknownDefaultSize`] if `default_size` matches no tier.
    /// - [`CatalogError::DuplicateId`] if a flavor, size or option id repeats.
    pub fn new(
        flavors: Vec<Flavor>,
        sizes: Vec<SizeTier>,
        toppings: Vec<CustomOption>,
        mix_ins: Vec<CustomOption>,
        menu: Vec<MenuItem>,
        default_size: &str,
    ) -> Result<Self, CatalogError> {
        if sizes.is_empty() {
            return Err(CatalogError::NoSizes);
        }

        if !sizes.iter().any(|tier| tier.id == default_size) {
            return Err(CatalogError::UnknownDefaultSize(default_size.to_string()));
        }

        check_unique(flavors.iter().map(|flavor| flavor.id.as_str()))?;
        check_unique(sizes.iter().map(|tier| tier.id.as_str()))?;
        check_unique(toppings.iter().map(|option| option.id.as_str()))?;
        check_unique(mix_ins.iter().map(|option| option.id.as_str()))?;

        Ok(Catalog {
            flavors,
            sizes,
            toppings,
            mix_ins,
            menu,
            default_size: default_size.to_string(),
        })
    }

    /// All base flavors, in declaration order.
    #[must_use]
    pub fn flavors(&self) -> &[Flavor] {
        &self.flavors
    }

    /// Looks up a flavor by id.
    #[must_use]
    pub fn flavor(&self, id: &str) -> Option<&Flavor> {
        self.flavors.iter().find(|flavor| flavor.id == id)
    }

    /// All size tiers, in declaration order.
    #[must_use]
    pub fn sizes(&self) -> &[SizeTier] {
        &self.sizes
    }

    /// Looks up a size tier by id.
    #[must_use]
    pub fn size(&self, id: &str) -> Option<&SizeTier> {
        self.sizes.iter().find(|tier| tier.id == id)
    }

    /// Id of the tier pre-selected when a customization session opens.
    #[must_use]
    pub fn default_size_id(&self) -> &str {
        &self.default_size
    }

    /// Options of the given kind, in declaration order.
    #[must_use]
    pub fn options(&self, kind: OptionKind) -> &[CustomOption] {
        match kind {
            OptionKind::Topping => &self.toppings,
            OptionKind::MixIn => &self.mix_ins,
        }
    }

    /// Looks up an option of the given kind by id.
    #[must_use]
    pub fn option(&self, kind: OptionKind, id: &str) -> Option<&CustomOption> {
        self.options(kind).iter().find(|option| option.id == id)
    }

    /// All premade menu items, in declaration order.
    #[must_use]
    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    /// Looks up a premade menu item by id and optional size variant.
    #[must_use]
    pub fn menu_item(&self, id: &str, size: Option<&str>) -> Option<&MenuItem> {
        self.menu
            .iter()
            .find(|item| item.id == id && item.size.as_deref() == size)
    }
}

/// Derives a stable id from a display name: lowercased, whitespace runs
/// replaced with a single `-`.
#[must_use]
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = rustc_hash::FxHashSet::default();

    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
    }

    Ok(())
}
