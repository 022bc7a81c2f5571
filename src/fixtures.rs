//! Fixtures
//!
//! Loads a [`Catalog`] from a YAML fixture file. The reference dessert-shop
//! catalog ships with the crate and is available via [`dessert_shop`].

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError, CustomOption, Flavor, MenuItem, SizeTier},
    prices::Price,
};

/// The bundled reference catalog, verbatim from the original storefront.
const DESSERT_SHOP_YAML: &str = include_str!("../fixtures/catalog.yml");

/// Fixture parsing errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading a fixture file.
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price string that is not a dollars-and-cents amount.
    #[error("invalid price format: {0}")]
    InvalidPrice(String),

    /// The parsed data failed catalog validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    default_size: String,
    flavors: Vec<FlavorFixture>,
    sizes: Vec<SizeFixture>,
    #[serde(default)]
    menu: Vec<MenuItemFixture>,
    toppings: Vec<String>,
    mix_ins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FlavorFixture {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct SizeFixture {
    id: String,
    label: String,
    price: String,
    included: u32,
    #[serde(default)]
    combos: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MenuItemFixture {
    id: String,
    name: String,
    price: String,
    #[serde(default)]
    size: Option<String>,
}

/// Parses a `"5.25"` or `"$5.25"` style price into minor units.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not a non-negative
/// dollars amount with at most two decimal places.
pub fn parse_price(raw: &str) -> Result<Price, FixtureError> {
    let invalid = || FixtureError::InvalidPrice(raw.to_string());
    let amount = raw.trim().strip_prefix('$').unwrap_or(raw.trim());

    let (dollars, cents) = match amount.split_once('.') {
        Some((dollars, cents)) => (dollars, cents),
        None => (amount, ""),
    };

    let dollars: i64 = dollars
        .parse()
        .ok()
        .filter(|dollars| *dollars >= 0)
        .ok_or_else(invalid)?;

    let cents: i64 = match cents.len() {
        0 => Some(0),
        1 => cents.parse::<i64>().ok().map(|tenths| tenths * 10),
        2 => cents.parse().ok(),
        _ => None,
    }
    .filter(|cents| *cents >= 0)
    .ok_or_else(invalid)?;

    Ok(Price::new(dollars * 100 + cents))
}

/// Parses a catalog from YAML fixture text.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the YAML is malformed, a price does not
/// parse, or the resulting catalog fails validation.
pub fn from_str(contents: &str) -> Result<Catalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(contents)?;

    let flavors = fixture
        .flavors
        .into_iter()
        .map(|flavor| Flavor {
            id: flavor.id,
            name: flavor.name,
            description: flavor.description,
        })
        .collect();

    let sizes = fixture
        .sizes
        .into_iter()
        .map(|size| {
            Ok(SizeTier {
                id: size.id,
                label: size.label,
                base_price: parse_price(&size.price)?,
                included_capacity: size.included,
                combos: size.combos,
            })
        })
        .collect::<Result<Vec<_>, FixtureError>>()?;

    let menu = fixture
        .menu
        .into_iter()
        .map(|item| {
            Ok(MenuItem {
                id: item.id,
                name: item.name,
                price: parse_price(&item.price)?,
                size: item.size,
            })
        })
        .collect::<Result<Vec<_>, FixtureError>>()?;

    let toppings = fixture
        .toppings
        .iter()
        .map(|name| CustomOption::named(name))
        .collect();

    let mix_ins = fixture
        .mix_ins
        .iter()
        .map(|name| CustomOption::named(name))
        .collect();

    let catalog = Catalog::new(flavors, sizes, toppings, mix_ins, menu, &fixture.default_size)?;

    Ok(catalog)
}

/// Loads a catalog from a YAML fixture file on disk.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<Catalog, FixtureError> {
    let contents = fs::read_to_string(path)?;

    from_str(&contents)
}

/// The bundled dessert-shop catalog: 9 flavors, Small/Regular tiers,
/// 41 toppings and 18 mix-ins.
///
/// # Errors
///
/// Returns a [`FixtureError`] if the bundled fixture fails to parse; it is
/// covered by tests, so this only fires if the crate data is edited badly.
pub fn dessert_shop() -> Result<Catalog, FixtureError> {
    from_str(DESSERT_SHOP_YAML)
}
