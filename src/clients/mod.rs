//! Typed handles for callers of the store actor.

#[macro_use]
mod macros;

pub mod cart_client;
pub mod catalog_client;
pub mod order_client;
pub mod promo_client;
pub mod user_client;

pub use cart_client::CartClient;
pub use catalog_client::CatalogClient;
pub use order_client::OrderClient;
pub use promo_client::PromoClient;
pub use user_client::UserClient;
