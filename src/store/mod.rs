//! The store actor and the tables it owns.
//!
//! Every read and write goes through one [`StoreActor`], which handles
//! requests strictly one at a time. Writes run against a staged copy of
//! [`ShopState`] and replace the live copy only after they succeeded and the
//! snapshot was saved.

pub mod actor;
pub mod storage;

pub use actor::{StoreActor, StoreClient};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};

use serde::{Deserialize, Serialize};

use crate::cart::Carts;
use crate::catalog::Catalog;
use crate::orders::OrderBook;
use crate::promo::PromoBook;
use crate::users::Directory;

/// All tables of the shop, including their id sequences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopState {
    pub users: Directory,
    pub catalog: Catalog,
    pub carts: Carts,
    pub orders: OrderBook,
    pub promos: PromoBook,
}

impl ShopState {
    /// Empty shop with the default promo codes.
    pub fn seeded() -> Self {
        Self {
            promos: PromoBook::seeded(),
            ..Self::default()
        }
    }
}
