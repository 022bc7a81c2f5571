//! Scoops prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    availability::{AVAILABILITY_KEY, Availability},
    cart::{CART_KEY, Cart, CartBook, CartLine},
    catalog::{Catalog, CatalogError, CustomOption, Flavor, MenuItem, OptionKind, SizeTier},
    catering::{Inquiry, InquiryError, InquiryForm, SubmitState},
    checkout::{LineItem, OrderSnapshot},
    fixtures::{FixtureError, dessert_shop},
    prices::Price,
    pricing::{EXTRA_UNIT_PRICE, MAX_CHARGEABLE_EXTRAS, Quote, quote, selection_cap},
    session::{CUSTOM_ITEM_ID, Session, SessionError},
    shop::{Shop, ShopError},
    store::{FileBackend, MemoryBackend, StorageBackend, StorageError, Store},
};
