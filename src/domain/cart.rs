use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-user staging area: product id to quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: i64,
    pub lines: BTreeMap<i64, i64>,
}

/// A cart line joined with the live product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

impl Cart {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            lines: BTreeMap::new(),
        }
    }
}
