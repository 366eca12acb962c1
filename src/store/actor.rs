use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{CheckoutOptions, NewOrder, OrderItemRequest, OrderRecord, OrderStatus, StatusChange};
use crate::error::ShopError;
use crate::messages::{ServiceResponse, StoreRequest};
use crate::orders::{export_csv, place_order, to_record};

use super::{ShopState, Storage};

/// Macro for clean error response handling
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

/// Single owner of every table. Requests are handled one at a time in
/// arrival order, which makes each of them a serializable transaction.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    state: ShopState,
    storage: Arc<dyn Storage>,
}

impl StoreActor {
    pub fn new(buffer_size: usize, state: ShopState, storage: Arc<dyn Storage>) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            state,
            storage,
        };
        (actor, StoreClient::new(sender))
    }

    /// Main actor loop.
    ///
    /// Reads answer from the live tables. Writes go through [`Self::transact`].
    #[instrument(name = "store_actor", skip(self))]
    pub async fn run(mut self) {
        info!("StoreActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                // --- Catalog ---
                StoreRequest::ListAvailable { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.catalog.list_available()));
                }
                StoreRequest::ListForAdmin { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.catalog.list_for_admin()));
                }
                StoreRequest::GetProduct { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.state.catalog.get(id).cloned()));
                }
                StoreRequest::UpsertProduct { name, price, quantity, respond_to } => {
                    let result = self.transact(|s| s.catalog.upsert_by_name(&name, price, quantity)).await;
                    let _ = respond_to.send(result);
                }
                StoreRequest::UpdateProduct { id, name, price, quantity, respond_to } => {
                    let result = self.transact(|s| s.catalog.update_product(id, &name, price, quantity)).await;
                    let _ = respond_to.send(result);
                }
                StoreRequest::SetQuantity { id, quantity, respond_to } => {
                    let result = self.transact(|s| s.catalog.set_quantity(id, quantity)).await;
                    let _ = respond_to.send(result);
                }
                StoreRequest::DeleteProduct { id, respond_to } => {
                    let result = self.transact(|s| s.catalog.soft_delete(id)).await;
                    let _ = respond_to.send(result);
                }

                // --- Promo ---
                StoreRequest::ValidatePromo { code, subtotal, respond_to } => {
                    let result = self.state.promos.validate(&code, subtotal, Utc::now()).map_err(ShopError::from);
                    let _ = respond_to.send(result);
                }
                StoreRequest::UpsertPromo { code, terms, respond_to } => {
                    let result = self.transact(|s| s.promos.upsert(&code, terms)).await;
                    let _ = respond_to.send(result);
                }
                StoreRequest::ListPromos { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.promos.list()));
                }

                // --- Users ---
                StoreRequest::RegisterUser { id, first_name, username, respond_to } => {
                    let result = self
                        .transact(|s| s.users.register(id, &first_name, username.as_deref(), Utc::now()))
                        .await;
                    let _ = respond_to.send(result);
                }
                StoreRequest::GetUser { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.state.users.get(id).cloned()));
                }

                // --- Cart ---
                StoreRequest::AddToCart { user_id, product_id, quantity, respond_to } => {
                    let result = self
                        .transact(|s| s.carts.add(&s.catalog, user_id, product_id, quantity))
                        .await;
                    let _ = respond_to.send(result);
                }
                StoreRequest::UpdateCart { user_id, product_id, change, respond_to } => {
                    let result = self.transact(|s| s.carts.change(user_id, product_id, change)).await;
                    let _ = respond_to.send(result);
                }
                StoreRequest::GetCart { user_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.state.carts.lines(&self.state.catalog, user_id)));
                }
                StoreRequest::ClearCart { user_id, respond_to } => {
                    let result = self
                        .transact(|s| {
                            s.carts.clear(user_id);
                            Ok(())
                        })
                        .await;
                    let _ = respond_to.send(result);
                }

                // --- Orders ---
                StoreRequest::CreateOrder { order, respond_to } => {
                    self.handle_create_order(order, respond_to).await;
                }
                StoreRequest::CheckoutCart { user_id, location, options, respond_to } => {
                    self.handle_checkout_cart(user_id, location, options, respond_to).await;
                }
                StoreRequest::SetOrderStatus { id, status, respond_to } => {
                    self.handle_set_order_status(id, status, respond_to).await;
                }
                StoreRequest::GetOrder { id, respond_to } => {
                    let record = self.state.orders.get(id).map(|o| to_record(o, &self.state.users));
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::ListOrders { filter, respond_to } => {
                    let _ = respond_to.send(Ok(self.state.orders.list(filter, &self.state.users)));
                }
                StoreRequest::UserOrders { user_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.state.orders.list_for_user(user_id, &self.state.users)));
                }
                StoreRequest::Stats { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.orders.stats()));
                }
                StoreRequest::Customers { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.orders.customers(&self.state.users)));
                }
                StoreRequest::ExportOrders { respond_to } => {
                    let csv = export_csv(&self.state.orders.records(&self.state.users));
                    let _ = respond_to.send(Ok(csv));
                }

                StoreRequest::Shutdown => {
                    info!("StoreActor shutting down");
                    break;
                }
                #[cfg(test)]
                StoreRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.clone()));
                }
            }
        }

        info!("StoreActor stopped");
    }

    /// Runs `op` on a staged copy, saves it, then swaps it in. Any error
    /// discards the staged copy.
    async fn transact<T>(&mut self, op: impl FnOnce(&mut ShopState) -> Result<T, ShopError>) -> Result<T, ShopError> {
        let mut staged = self.state.clone();
        let value = op(&mut staged)?;
        if let Err(e) = self.storage.save(&staged).await {
            error!(error = %e, "Snapshot write failed, changes rolled back");
            return Err(e);
        }
        self.state = staged;
        Ok(value)
    }

    #[instrument(fields(buyer_id = order.buyer_id), skip(self, order, respond_to))]
    async fn handle_create_order(&mut self, order: NewOrder, respond_to: ServiceResponse<OrderRecord>) {
        debug!("Processing create_order request");
        let now = Utc::now();
        let result = self
            .transact(|s| {
                let created = place_order(s, &order, now)?;
                Ok(to_record(&created, &s.users))
            })
            .await;
        if let Err(e) = &result {
            warn!(error = %e, "Order rejected");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, location, options, respond_to))]
    async fn handle_checkout_cart(
        &mut self,
        user_id: i64,
        location: String,
        options: CheckoutOptions,
        respond_to: ServiceResponse<OrderRecord>,
    ) {
        debug!("Processing checkout_cart request");

        let items: Vec<OrderItemRequest> = self
            .state
            .carts
            .lines(&self.state.catalog, user_id)
            .into_iter()
            .map(|line| OrderItemRequest {
                id: line.product_id,
                quantity: line.quantity,
            })
            .collect();
        if items.is_empty() {
            warn!("Cart is empty");
            send_error!(respond_to, ShopError::validation("Cart is empty"));
        }

        let order = NewOrder {
            buyer_id: user_id,
            location,
            items,
            notes: options.notes,
            delivery_slot: options.delivery_slot,
            promo_code: options.promo_code,
            discount_amount: None,
        };
        self.handle_create_order(order, respond_to).await;
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_set_order_status(
        &mut self,
        id: i64,
        status: OrderStatus,
        respond_to: ServiceResponse<Option<StatusChange>>,
    ) {
        debug!("Processing set_order_status request");
        if self.state.orders.get(id).is_none() {
            debug!("Order not found");
            let _ = respond_to.send(Ok(None));
            return;
        }
        let result = self
            .transact(|s| {
                let ShopState { orders, users, .. } = s;
                orders.set_status(id, status, users)
            })
            .await;
        let _ = respond_to.send(result);
    }
}

/// Handle for the store actor's lifecycle. Domain clients share its sender.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    pub fn sender(&self) -> mpsc::Sender<StoreRequest> {
        self.sender.clone()
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ShopError> {
        debug!("Sending shutdown request");
        self.sender
            .send(StoreRequest::Shutdown)
            .await
            .map_err(|e| ShopError::ActorCommunication(e.to_string()))
    }
}

// Test-only method for internal state inspection
#[cfg(test)]
crate::client_method!(StoreClient => pub fn snapshot() -> ShopState as StoreRequest::Snapshot);
