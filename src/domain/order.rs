use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ShopError;

/// Order status. Every state can reach every other one; new orders start pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and confirmed orders still need staff attention.
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ShopError::validation(format!("Invalid status: {}", s)))
    }
}

/// Snapshot of one product as purchased. Never follows later catalog edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price: i64,
}

impl LineItem {
    /// `None` when `price * quantity` does not fit in an `i64`.
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(self.quantity)
    }
}

/// Sum of all line totals.
///
/// # Errors
/// `Validation` when any line total or the sum does not fit in an `i64`.
pub fn items_subtotal(items: &[LineItem]) -> Result<i64, ShopError> {
    items
        .iter()
        .try_fold(0i64, |sum, item| item.line_total().and_then(|line| sum.checked_add(line)))
        .ok_or_else(|| ShopError::validation("Order total too large"))
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub location: String,
    pub items: Vec<LineItem>,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub delivery_slot: Option<String>,
    pub promo_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for persisting an order whose items already passed stock checks.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: i64,
    pub location: String,
    pub items: Vec<LineItem>,
    pub discount_amount: i64,
    pub notes: Option<String>,
    pub delivery_slot: Option<String>,
    pub promo_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One requested product reference in a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub id: i64,
    pub quantity: i64,
}

/// A buyer's checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub buyer_id: i64,
    pub location: String,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub delivery_slot: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub discount_amount: Option<i64>,
}

impl NewOrder {
    pub fn new(buyer_id: i64, location: impl Into<String>, items: Vec<OrderItemRequest>) -> Self {
        Self {
            buyer_id,
            location: location.into(),
            items,
            notes: None,
            delivery_slot: None,
            promo_code: None,
            discount_amount: None,
        }
    }

    pub fn with_promo(mut self, code: impl Into<String>) -> Self {
        self.promo_code = Some(code.into());
        self
    }

    pub fn with_discount(mut self, amount: i64) -> Self {
        self.discount_amount = Some(amount);
        self
    }
}

/// Order options of a cart checkout; the items come from the buyer's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub delivery_slot: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// An order joined with the buyer's display info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: Option<String>,
    pub user_username: Option<String>,
}

/// Outcome of a status overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: OrderStatus,
    pub record: OrderRecord,
}

impl StatusChange {
    pub fn changed(&self) -> bool {
        self.previous != self.record.order.status
    }
}

/// Which orders a staff listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderFilter {
    Pending,
    Active,
    Cancelled,
    All,
}

impl OrderFilter {
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            OrderFilter::Pending => status == OrderStatus::Pending,
            OrderFilter::Active => status.is_active(),
            OrderFilter::Cancelled => status == OrderStatus::Cancelled,
            OrderFilter::All => true,
        }
    }
}
