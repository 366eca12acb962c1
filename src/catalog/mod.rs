//! Product catalog: listings, staff edits, and the conditional stock decrement
//! used by checkout.

mod actions;
pub mod entity;

pub use actions::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actor_framework::{Sequence, Table};
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::error::ShopError;

use entity::{validate_name, validate_price, validate_quantity};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    products: Table<Product>,
    sequence: Sequence,
}

impl Catalog {
    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Available product with this id, if any.
    pub fn get_available(&self, id: i64) -> Option<&Product> {
        self.products.get(&id).filter(|p| p.is_available)
    }

    fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.values().find(|p| p.name == name)
    }

    /// Products a buyer can order right now, in id order.
    pub fn list_available(&self) -> Vec<Product> {
        self.products.values().filter(|p| p.is_listed()).cloned().collect()
    }

    /// Every non-deleted product, including sold-out ones.
    pub fn list_for_admin(&self) -> Vec<Product> {
        self.products.values().filter(|p| p.is_available).cloned().collect()
    }

    /// Overwrites price and stock of the product with this name and undeletes
    /// it, or inserts a new product under the next sequence id.
    pub fn upsert_by_name(&mut self, name: &str, price: i64, quantity: i64) -> Result<Product, ShopError> {
        let name = validate_name(name)?;
        let price = validate_price(price)?;
        let quantity = validate_quantity(quantity)?;

        if let Some(id) = self.find_by_name(&name).map(|p| p.id) {
            let patch = ProductPatch {
                name: None,
                price: Some(price),
                quantity: Some(quantity),
                is_available: Some(true),
            };
            let product = self.products.update(&id, patch)?;
            info!(product_id = id, product_name = %product.name, "Product replaced");
            return Ok(product.clone());
        }

        let id = self.sequence.next_id();
        let product = self.products.create(id, ProductCreate { name, price, quantity })?;
        info!(product_id = id, product_name = %product.name, "Product added");
        Ok(product.clone())
    }

    /// Staff edit of name, price, and stock. Names stay unique.
    pub fn update_product(&mut self, id: i64, name: &str, price: i64, quantity: i64) -> Result<Product, ShopError> {
        let name = validate_name(name)?;
        if self.find_by_name(&name).is_some_and(|p| p.id != id) {
            return Err(ShopError::validation(format!("Product name already in use: {}", name)));
        }
        let patch = ProductPatch {
            name: Some(name),
            price: Some(price),
            quantity: Some(quantity),
            is_available: None,
        };
        let product = self.products.update(&id, patch).map_err(|e| match e {
            ShopError::NotFound(_) => ShopError::not_found(format!("Product {}", id)),
            other => other,
        })?;
        info!(product_id = id, "Product updated");
        Ok(product.clone())
    }

    pub fn set_quantity(&mut self, id: i64, quantity: i64) -> Result<Product, ShopError> {
        validate_quantity(quantity)?;
        self.act(id, ProductAction::SetQuantity(quantity))?;
        debug!(product_id = id, quantity, "Stock set");
        self.get(id).cloned().ok_or_else(|| ShopError::not_found(format!("Product {}", id)))
    }

    pub fn soft_delete(&mut self, id: i64) -> Result<Product, ShopError> {
        self.act(id, ProductAction::SoftDelete)?;
        info!(product_id = id, "Product hidden");
        self.get(id).cloned().ok_or_else(|| ShopError::not_found(format!("Product {}", id)))
    }

    /// Conditional decrement: succeeds only when enough stock is on hand.
    pub fn reserve(&mut self, id: i64, quantity: i64) -> Result<i64, ShopError> {
        match self.act(id, ProductAction::Reserve(quantity))? {
            ProductActionResult::Reserved(left) => Ok(left),
            other => Err(ShopError::Storage(format!("Unexpected result: {:?}", other))),
        }
    }

    fn act(&mut self, id: i64, action: ProductAction) -> Result<ProductActionResult, ShopError> {
        self.products.perform_action(&id, action).map_err(|e| match e {
            ShopError::NotFound(_) => ShopError::not_found(format!("Product {}", id)),
            other => other,
        })
    }
}
