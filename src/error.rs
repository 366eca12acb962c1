use thiserror::Error;

/// Why a promo code was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromoError {
    #[error("Promo code not found: {0}")]
    NotFound(String),
    #[error("Promo code expired: {0}")]
    Expired(String),
    #[error("Promo code has no uses left: {0}")]
    Exhausted(String),
    #[error("Order subtotal is below the promo minimum of {min_order}")]
    BelowMinimum { min_order: i64 },
}

/// Errors surfaced by every store operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("No requested item could be fulfilled")]
    EmptyOrder,
    #[error(transparent)]
    Promo(#[from] PromoError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl ShopError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Stable machine-readable name, used in API replies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::EmptyOrder => "empty_order",
            Self::Promo(_) => "promo",
            Self::Storage(_) => "storage",
            Self::ActorCommunication(_) => "unavailable",
        }
    }
}

impl From<std::io::Error> for ShopError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Delivery failure of a single notification. Logged, never returned to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Recipient {0} is unreachable")]
    Unreachable(i64),
    #[error("Notification transport error: {0}")]
    Transport(String),
}
