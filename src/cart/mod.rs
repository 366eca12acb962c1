//! Per-user carts. A cart is only a staging area; checkout clears it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor_framework::{Entity, Table};
use crate::catalog::Catalog;
use crate::domain::{Cart, CartLine};
use crate::error::ShopError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    /// Adds units to a line, creating it if needed.
    Add { product_id: i64, quantity: i64 },
    /// Shifts a line by `change`; the line is dropped at zero or below.
    Change { product_id: i64, change: i64 },
}

impl Entity for Cart {
    type Id = i64;
    type CreatePayload = ();
    type Patch = ();
    type Action = CartAction;
    type ActionResult = bool;

    fn id(&self) -> &i64 {
        &self.user_id
    }

    fn from_create(user_id: i64, _params: ()) -> Result<Self, ShopError> {
        Ok(Cart::new(user_id))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), ShopError> {
        Ok(())
    }

    fn handle_action(&mut self, action: CartAction) -> Result<bool, ShopError> {
        match action {
            CartAction::Add { product_id, quantity } => {
                let line = self.lines.entry(product_id).or_insert(0);
                *line = line
                    .checked_add(quantity)
                    .ok_or_else(|| ShopError::validation("Cart quantity too large"))?;
                Ok(true)
            }
            CartAction::Change { product_id, change } => {
                let Some(current) = self.lines.get(&product_id).copied() else {
                    return Ok(false);
                };
                let next = current
                    .checked_add(change)
                    .ok_or_else(|| ShopError::validation("Cart quantity too large"))?;
                if next <= 0 {
                    self.lines.remove(&product_id);
                } else {
                    self.lines.insert(product_id, next);
                }
                Ok(true)
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Carts {
    carts: Table<Cart>,
}

impl Carts {
    pub fn add(&mut self, catalog: &Catalog, user_id: i64, product_id: i64, quantity: i64) -> Result<(), ShopError> {
        if quantity <= 0 {
            return Err(ShopError::validation(format!("Invalid quantity: {}", quantity)));
        }
        if catalog.get_available(product_id).is_none() {
            return Err(ShopError::not_found(format!("Product {}", product_id)));
        }
        if !self.carts.contains(&user_id) {
            self.carts.create(user_id, ())?;
        }
        self.carts.perform_action(&user_id, CartAction::Add { product_id, quantity })?;
        debug!(user_id, product_id, quantity, "Added to cart");
        Ok(())
    }

    /// Returns false when the user has no such line.
    pub fn change(&mut self, user_id: i64, product_id: i64, change: i64) -> Result<bool, ShopError> {
        if !self.carts.contains(&user_id) {
            return Ok(false);
        }
        self.carts.perform_action(&user_id, CartAction::Change { product_id, change })
    }

    /// Cart lines joined with live product rows. Lines whose product is gone are skipped.
    pub fn lines(&self, catalog: &Catalog, user_id: i64) -> Vec<CartLine> {
        let Some(cart) = self.carts.get(&user_id) else {
            return Vec::new();
        };
        cart.lines
            .iter()
            .filter_map(|(&product_id, &quantity)| {
                catalog.get_available(product_id).map(|p| CartLine {
                    product_id,
                    name: p.name.clone(),
                    price: p.price,
                    quantity,
                })
            })
            .collect()
    }

    pub fn clear(&mut self, user_id: i64) {
        if self.carts.remove(&user_id).is_some() {
            debug!(user_id, "Cart cleared");
        }
    }
}
