use crate::actor_framework::Entity;
use crate::domain::{items_subtotal, Order, OrderCreate, OrderStatus};
use crate::error::ShopError;

/// Custom actions for orders. Only the status ever changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    SetStatus(OrderStatus),
}

impl Entity for Order {
    type Id = i64;
    type CreatePayload = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    /// Status before the action ran
    type ActionResult = OrderStatus;

    fn id(&self) -> &i64 {
        &self.id
    }

    /// Creates a pending order and fixes its totals.
    ///
    /// `total = max(subtotal - discount, 0)` where the subtotal is taken from
    /// the line item snapshots.
    fn from_create(id: i64, params: OrderCreate) -> Result<Self, ShopError> {
        if params.items.is_empty() {
            return Err(ShopError::EmptyOrder);
        }
        if params.discount_amount < 0 {
            return Err(ShopError::validation("Discount must not be negative"));
        }
        let subtotal = items_subtotal(&params.items)?;
        let discount_amount = params.discount_amount.min(subtotal);
        Ok(Self {
            id,
            user_id: params.user_id,
            location: params.location,
            items: params.items,
            subtotal,
            discount_amount,
            total: (subtotal - discount_amount).max(0),
            status: OrderStatus::Pending,
            notes: params.notes,
            delivery_slot: params.delivery_slot,
            promo_code: params.promo_code,
            created_at: params.created_at,
        })
    }

    /// Orders are frozen once created.
    fn on_update(&mut self, _patch: ()) -> Result<(), ShopError> {
        Err(ShopError::validation("Orders cannot be edited"))
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderStatus, ShopError> {
        match action {
            OrderAction::SetStatus(status) => {
                let previous = self.status;
                self.status = status;
                Ok(previous)
            }
        }
    }
}
