//! Orders: the checkout transaction, the status lifecycle, and staff reports.

pub mod entity;
pub mod lifecycle;
pub mod reports;
pub mod transaction;

pub use entity::OrderAction;
pub use lifecycle::to_record;
pub use reports::{export_csv, CustomerSummary, ProductSales, ShopStats};
pub use transaction::place_order;

use serde::{Deserialize, Serialize};

use crate::actor_framework::{Sequence, Table};
use crate::domain::{Order, OrderCreate};
use crate::error::ShopError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    orders: Table<Order>,
    sequence: Sequence,
}

impl OrderBook {
    pub fn get(&self, id: i64) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub(crate) fn insert(&mut self, params: OrderCreate) -> Result<Order, ShopError> {
        let id = self.sequence.next_id();
        Ok(self.orders.create(id, params)?.clone())
    }

    /// Newest first; ties broken by the higher id.
    pub fn newest_first(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.values().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        orders
    }
}
