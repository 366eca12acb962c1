//! Order-management backend for a small storefront.
//!
//! One [`store::StoreActor`] owns the catalog, carts, users, promo codes and
//! orders. Typed clients in [`clients`] talk to it over channels, and
//! [`app_system::ShopSystem`] wires everything together.

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod cart;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod messages;
pub mod notify;
pub mod orders;
pub mod promo;
pub mod store;
pub mod users;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;
