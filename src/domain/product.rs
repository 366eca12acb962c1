use serde::{Deserialize, Serialize};

/// A catalog entry. Prices are in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
    pub is_available: bool,
}

/// Payload for creating a new product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

/// Payload for editing an existing product. `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub is_available: Option<bool>,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, price: i64, quantity: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity,
            is_available: true,
        }
    }

    /// Listed for buyers: available and in stock.
    pub fn is_listed(&self) -> bool {
        self.is_available && self.quantity > 0
    }
}
