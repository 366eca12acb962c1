use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::domain::{CheckoutOptions, NewOrder, OrderFilter, OrderRecord, OrderStatus, StatusChange};
use crate::error::ShopError;
use crate::messages::StoreRequest;
use crate::notify::NotificationDispatcher;
use crate::orders::{CustomerSummary, ShopStats};

/// Client for placing and managing orders.
///
/// Writes go to the store actor first. Staff and buyer notifications are
/// dispatched only after the store has committed, so a rejected order never
/// notifies anyone.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<StoreRequest>,
    notifier: NotificationDispatcher,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>, notifier: NotificationDispatcher) -> Self {
        Self { sender, notifier }
    }

    /// Runs the order transaction and returns the new order id.
    #[instrument(skip(self, order), fields(buyer_id = order.buyer_id))]
    pub async fn create_order(&self, order: NewOrder) -> Result<i64, ShopError> {
        let record = self.submit_order(order).await?;
        info!(order_id = record.order.id, total = record.order.total, "Order created");
        let id = record.order.id;
        self.notifier.order_created(record);
        Ok(id)
    }

    /// Places an order from everything in the buyer's cart.
    #[instrument(skip(self, location, options))]
    pub async fn checkout_cart(
        &self,
        user_id: i64,
        location: String,
        options: CheckoutOptions,
    ) -> Result<i64, ShopError> {
        let record = self.submit_checkout(user_id, location, options).await?;
        info!(order_id = record.order.id, total = record.order.total, "Cart checked out");
        let id = record.order.id;
        self.notifier.order_created(record);
        Ok(id)
    }

    /// Overwrites the status. `None` when the order does not exist.
    ///
    /// Setting the status an order already has is a no-op for notifications.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: i64, status: OrderStatus) -> Result<Option<OrderRecord>, ShopError> {
        let Some(change) = self.submit_status(id, status).await? else {
            warn!("Order not found");
            return Ok(None);
        };
        if change.changed() {
            info!(from = %change.previous, to = %status, "Order status changed");
            self.notifier.status_changed(change.record.clone());
        }
        Ok(Some(change.record))
    }
}

client_method!(OrderClient => fn submit_order(order: NewOrder) -> OrderRecord as StoreRequest::CreateOrder);
client_method!(OrderClient => fn submit_checkout(user_id: i64, location: String, options: CheckoutOptions) -> OrderRecord as StoreRequest::CheckoutCart);
client_method!(OrderClient => fn submit_status(id: i64, status: OrderStatus) -> Option<StatusChange> as StoreRequest::SetOrderStatus);

client_method!(OrderClient => pub fn get_order(id: i64) -> Option<OrderRecord> as StoreRequest::GetOrder);
client_method!(OrderClient => pub fn list_orders(filter: OrderFilter) -> Vec<OrderRecord> as StoreRequest::ListOrders);
client_method!(OrderClient => pub fn user_orders(user_id: i64) -> Vec<OrderRecord> as StoreRequest::UserOrders);
client_method!(OrderClient => pub fn stats() -> ShopStats as StoreRequest::Stats);
client_method!(OrderClient => pub fn customers() -> Vec<CustomerSummary> as StoreRequest::Customers);
client_method!(OrderClient => pub fn export_orders() -> String as StoreRequest::ExportOrders);

order_listing!(OrderClient => pending: Pending, active: Active, cancelled: Cancelled, all: All);
