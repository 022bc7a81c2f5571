//! Storefront Demo
//!
//! Builds a custom cup against the bundled dessert-shop catalog, commits it
//! to a durable cart, adds a premade item, then prints the cart and the
//! checkout snapshot.
//!
//! Use `-f` to pick the base flavor and `--size` the tier
//! Use `-c` to commit more than one cup
//! Use `--fresh` to clear the persisted cart first

use anyhow::Result;
use clap::Parser;
use tabled::{Table, Tabled};

use scoops::{
    catalog::OptionKind,
    fixtures,
    session::Session,
    shop::Shop,
    store::FileBackend,
    utils::DemoArgs,
};

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "Item")]
    name: String,

    #[tabled(rename = "Unit")]
    unit: String,

    #[tabled(rename = "Qty")]
    qty: u32,

    #[tabled(rename = "Line total")]
    line_total: String,
}

/// Storefront Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = DemoArgs::parse();

    let catalog = fixtures::dessert_shop()?;
    let mut shop = Shop::open(FileBackend::new(&args.store));

    if args.fresh {
        shop.clear_cart();
    }

    let mut session = Session::open(&catalog, &args.flavor)?;
    session.set_size(&args.size)?;
    session.adjust_option(OptionKind::Topping, "oreo", 2)?;
    session.adjust_option(OptionKind::Topping, "strawberry", 1)?;
    session.adjust_option(OptionKind::MixIn, "condensed-milk", 1)?;
    session.set_cups(args.cups);
    session.set_notes("extra sauce on the side");

    let quote = session.commit(&mut shop)?;
    println!("committed {} cup(s): {}", args.cups, quote.label);

    shop.add_to_cart(&catalog, "mango-sticky-rice", None)?;

    let rows: Vec<CartRow> = shop
        .cart()
        .lines()
        .map(|line| CartRow {
            name: line.name.clone(),
            unit: line.price.to_string(),
            qty: line.qty,
            line_total: line.line_total().to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("{} item(s) — {}", shop.count(), shop.total());

    let snapshot = shop.checkout()?;
    println!("\ncheckout payload:\n{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
