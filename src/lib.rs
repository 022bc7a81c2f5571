//! Scoops
//!
//! Scoops is the cart, customization and pricing core for a build-your-own
//! dessert cup storefront: a durable key-value store with graceful in-memory
//! fallback, a merge-keyed cart aggregate, a tiered-inclusion pricing engine,
//! the customization session that gates selections, and the sparse
//! availability overlay that gates adds.

pub mod availability;
pub mod cart;
pub mod catalog;
pub mod catering;
pub mod checkout;
pub mod fixtures;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod session;
pub mod shop;
pub mod store;
pub mod utils;
