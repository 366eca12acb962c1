use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::clients::{CartClient, CatalogClient, OrderClient, PromoClient, UserClient};
use crate::config::Config;
use crate::error::ShopError;
use crate::notify::{NotificationDispatcher, Notifier};
use crate::store::{JsonFileStorage, MemoryStorage, ShopState, Storage, StoreActor, StoreClient};

/// The running shop: one store actor plus the typed clients wired to it.
///
/// Responsible for loading the snapshot, starting the actor, injecting the
/// notification dispatcher, and handling shutdown.
pub struct ShopSystem {
    pub catalog_client: CatalogClient,
    pub promo_client: PromoClient,
    pub user_client: UserClient,
    pub cart_client: CartClient,
    pub order_client: OrderClient,
    store_client: StoreClient,
    handle: JoinHandle<()>,
}

impl ShopSystem {
    /// Starts with the storage named by `config`.
    pub async fn start(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self, ShopError> {
        let storage: Arc<dyn Storage> = match &config.data_path {
            Some(path) => Arc::new(JsonFileStorage::new(path)),
            None => Arc::new(MemoryStorage),
        };
        Self::with_storage(config, storage, notifier).await
    }

    pub async fn with_storage(
        config: &Config,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ShopError> {
        // 1. Restore or seed the tables
        let state = match storage.load().await? {
            Some(state) => state,
            None if config.seed_promos => {
                info!("Starting with a fresh shop and default promo codes");
                ShopState::seeded()
            }
            None => ShopState::default(),
        };
        info!(
            products = state.catalog.list_for_admin().len(),
            orders = state.orders.len(),
            "Shop state ready"
        );

        // 2. Start the single store actor
        let (actor, store_client) = StoreActor::new(config.store_buffer, state, storage);
        let handle = tokio::spawn(actor.run());

        // 3. Wire the clients; orders get the dispatcher injected
        let dispatcher = NotificationDispatcher::new(notifier, config.staff_ids());
        let sender = store_client.sender();

        Ok(Self {
            catalog_client: CatalogClient::new(sender.clone()),
            promo_client: PromoClient::new(sender.clone()),
            user_client: UserClient::new(sender.clone()),
            cart_client: CartClient::new(sender.clone()),
            order_client: OrderClient::new(sender, dispatcher),
            store_client,
            handle,
        })
    }

    pub async fn shutdown(self) -> Result<(), ShopError> {
        info!("Shutting down system...");
        self.store_client.shutdown().await?;

        if let Err(e) = self.handle.await {
            error!("Store task failed: {:?}", e);
            return Err(ShopError::ActorCommunication(format!("Store task failed: {}", e)));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
