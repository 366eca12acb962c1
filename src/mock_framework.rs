//! # Mock Framework
//!
//! Utilities for testing clients without a running store actor.
//!
//! Use [`create_mock_store`] to get a sender for a client and the receiver the
//! actor would own. Then use helpers like [`expect_create_order`] or
//! [`expect_set_status`] to inspect each request and answer it by hand.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{NewOrder, OrderRecord, OrderStatus, StatusChange};
use crate::error::NotificationError;
use crate::messages::{ServiceResponse, StoreRequest};
use crate::notify::{NotificationDispatcher, Notifier, OrderEvent};

/// Creates the two ends of a store channel.
///
/// The sender goes into the client under test. The test keeps the receiver
/// and plays the store: it can answer with success, failure, or not at all.
pub fn create_mock_store(buffer_size: usize) -> (mpsc::Sender<StoreRequest>, mpsc::Receiver<StoreRequest>) {
    mpsc::channel(buffer_size)
}

/// Helper to verify that the next message is a CreateOrder request
pub async fn expect_create_order(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(NewOrder, ServiceResponse<OrderRecord>)> {
    match receiver.recv().await {
        Some(StoreRequest::CreateOrder { order, respond_to }) => Some((order, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a SetOrderStatus request
pub async fn expect_set_status(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(i64, OrderStatus, ServiceResponse<Option<StatusChange>>)> {
    match receiver.recv().await {
        Some(StoreRequest::SetOrderStatus { id, status, respond_to }) => Some((id, status, respond_to)),
        _ => None,
    }
}

/// Notifier that forwards every delivery into a channel the test reads.
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<(i64, OrderEvent)>,
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn deliver(&self, recipient: i64, event: &OrderEvent) -> Result<(), NotificationError> {
        self.sender
            .send((recipient, event.clone()))
            .map_err(|e| NotificationError::Transport(e.to_string()))
    }
}

/// Keeps every delivery in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<(i64, OrderEvent)>>,
}

impl RecordingNotifier {
    pub fn delivered(&self) -> Vec<(i64, OrderEvent)> {
        self.delivered.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, recipient: i64, event: &OrderEvent) -> Result<(), NotificationError> {
        self.delivered
            .lock()
            .map_err(|e| NotificationError::Transport(e.to_string()))?
            .push((recipient, event.clone()));
        Ok(())
    }
}

/// Dispatcher for `staff` whose deliveries land in the returned receiver.
pub fn create_mock_dispatcher(staff: Vec<i64>) -> (NotificationDispatcher, mpsc::UnboundedReceiver<(i64, OrderEvent)>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let dispatcher = NotificationDispatcher::new(Arc::new(ChannelNotifier { sender }), staff);
    (dispatcher, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CatalogClient;
    use crate::domain::Product;

    #[tokio::test]
    async fn test_mock_store() {
        let (sender, mut receiver) = create_mock_store(10);
        let client = CatalogClient::new(sender);

        let lookup = tokio::spawn(async move { client.get_product(3).await });

        match receiver.recv().await {
            Some(StoreRequest::GetProduct { id, respond_to }) => {
                assert_eq!(id, 3);
                respond_to.send(Ok(Some(Product::new(3, "Mango", 250, 4)))).unwrap();
            }
            other => panic!("Unexpected request: {:?}", other),
        }

        let product = lookup.await.unwrap().unwrap().unwrap();
        assert_eq!(product.name, "Mango");
    }

    #[tokio::test]
    async fn test_dropped_store_is_a_communication_error() {
        let (sender, receiver) = create_mock_store(10);
        drop(receiver);
        let client = CatalogClient::new(sender);

        assert!(matches!(
            client.list_available().await,
            Err(crate::error::ShopError::ActorCommunication(_))
        ));
    }
}
