use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::error::ShopError;

use super::actions::{ProductAction, ProductActionResult};

pub(crate) fn validate_name(name: &str) -> Result<String, ShopError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ShopError::validation("Product name required"));
    }
    Ok(name.to_string())
}

pub(crate) fn validate_price(price: i64) -> Result<i64, ShopError> {
    if price <= 0 {
        return Err(ShopError::validation(format!("Price must be positive, got {}", price)));
    }
    Ok(price)
}

pub(crate) fn validate_quantity(quantity: i64) -> Result<i64, ShopError> {
    if quantity < 0 {
        return Err(ShopError::validation(format!("Quantity must not be negative, got {}", quantity)));
    }
    Ok(quantity)
}

impl Entity for Product {
    type Id = i64;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn id(&self) -> &i64 {
        &self.id
    }

    fn from_create(id: i64, params: ProductCreate) -> Result<Self, ShopError> {
        Ok(Self {
            id,
            name: validate_name(&params.name)?,
            price: validate_price(params.price)?,
            quantity: validate_quantity(params.quantity)?,
            is_available: true,
        })
    }

    /// Validates every field before writing any of them.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), ShopError> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let price = patch.price.map(validate_price).transpose()?;
        let quantity = patch.quantity.map(validate_quantity).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        if let Some(is_available) = patch.is_available {
            self.is_available = is_available;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ShopError> {
        match action {
            ProductAction::Reserve(amount) => {
                if amount <= 0 {
                    return Err(ShopError::validation(format!("Invalid quantity: {}", amount)));
                }
                if !self.is_available || self.quantity < amount {
                    return Err(ShopError::validation(format!(
                        "Insufficient stock: {} available, {} requested",
                        self.quantity, amount
                    )));
                }
                self.quantity -= amount;
                Ok(ProductActionResult::Reserved(self.quantity))
            }
            ProductAction::SetQuantity(quantity) => {
                self.quantity = validate_quantity(quantity)?;
                Ok(ProductActionResult::QuantitySet(self.quantity))
            }
            ProductAction::SoftDelete => {
                self.is_available = false;
                Ok(ProductActionResult::Deleted)
            }
        }
    }
}
