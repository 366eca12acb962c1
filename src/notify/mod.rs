//! Order events for staff and buyers.
//!
//! The core only emits events; how they reach people is up to the
//! [`Notifier`] given to [`NotificationDispatcher`] at construction. Delivery
//! runs in spawned tasks after the triggering write has committed, and every
//! failure is logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn, Instrument};

use crate::domain::{OrderRecord, OrderStatus};
use crate::error::NotificationError;

/// Payload delivered to staff and buyers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OrderEvent {
    NewOrder {
        order: OrderRecord,
    },
    OrderStatusUpdate {
        id: i64,
        status: OrderStatus,
        order: OrderRecord,
    },
}

impl OrderEvent {
    pub fn order(&self) -> &OrderRecord {
        match self {
            OrderEvent::NewOrder { order } | OrderEvent::OrderStatusUpdate { order, .. } => order,
        }
    }
}

/// Transport for a single message to a single chat id.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, recipient: i64, event: &OrderEvent) -> Result<(), NotificationError>;
}

/// Writes events to the log instead of a chat. Used when no transport is wired.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(&self, recipient: i64, event: &OrderEvent) -> Result<(), NotificationError> {
        let payload = serde_json::to_string(event).map_err(|e| NotificationError::Transport(e.to_string()))?;
        info!(recipient, %payload, "Notification");
        Ok(())
    }
}

/// Fans order events out to staff and the buyer.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    staff: Arc<Vec<i64>>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, staff: Vec<i64>) -> Self {
        Self {
            notifier,
            staff: Arc::new(staff),
        }
    }

    /// Tells staff about a new order.
    pub fn order_created(&self, order: OrderRecord) -> JoinHandle<()> {
        let recipients = self.staff.to_vec();
        self.dispatch(recipients, OrderEvent::NewOrder { order })
    }

    /// Tells staff and the buyer about a status change.
    pub fn status_changed(&self, order: OrderRecord) -> JoinHandle<()> {
        let mut recipients = self.staff.to_vec();
        if !recipients.contains(&order.order.user_id) {
            recipients.push(order.order.user_id);
        }
        let event = OrderEvent::OrderStatusUpdate {
            id: order.order.id,
            status: order.order.status,
            order,
        };
        self.dispatch(recipients, event)
    }

    fn dispatch(&self, recipients: Vec<i64>, event: OrderEvent) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        let span = tracing::info_span!("notify", order_id = event.order().order.id);
        tokio::spawn(
            async move {
                for recipient in recipients {
                    if let Err(e) = notifier.deliver(recipient, &event).await {
                        warn!(recipient, error = %e, "Notification not delivered");
                    }
                }
            }
            .instrument(span),
        )
    }
}
