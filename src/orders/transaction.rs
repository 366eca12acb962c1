//! The checkout write path.
//!
//! [`place_order`] mutates the tables it is given step by step. The store
//! actor always hands it a staged copy and only commits that copy when the
//! whole function succeeded and the snapshot was persisted, so an error at
//! any step leaves the live tables untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::catalog::Catalog;
use crate::domain::{items_subtotal, LineItem, NewOrder, Order, OrderCreate, OrderItemRequest};
use crate::error::ShopError;
use crate::store::ShopState;

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Entry checks that reject the request as a whole.
pub fn validate_request(request: &NewOrder) -> Result<(), ShopError> {
    if request.location.trim().is_empty() {
        return Err(ShopError::validation("Delivery location required"));
    }
    if request.items.is_empty() {
        return Err(ShopError::validation("At least one item required"));
    }
    if request.discount_amount.is_some_and(|d| d < 0) {
        return Err(ShopError::validation("Discount must not be negative"));
    }
    Ok(())
}

/// Keeps the requested items that can be fulfilled right now and snapshots
/// them. Unknown, unavailable, non-positive, or over-stock items are dropped.
/// Repeated references to one product draw from the same remaining stock.
pub fn select_items(catalog: &Catalog, requested: &[OrderItemRequest]) -> Vec<LineItem> {
    let mut remaining: BTreeMap<i64, i64> = BTreeMap::new();
    let mut items = Vec::new();

    for request in requested {
        let Some(product) = catalog.get_available(request.id) else {
            warn!(product_id = request.id, "Product not found, item skipped");
            continue;
        };
        if request.quantity <= 0 {
            warn!(product_id = request.id, quantity = request.quantity, "Invalid quantity, item skipped");
            continue;
        }
        let stock = remaining.entry(product.id).or_insert(product.quantity);
        if *stock < request.quantity {
            warn!(
                product_name = %product.name,
                available = *stock,
                requested = request.quantity,
                "Insufficient stock, item skipped"
            );
            continue;
        }
        *stock -= request.quantity;
        items.push(LineItem {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: request.quantity,
            price: product.price,
        });
    }
    items
}

/// Runs the whole checkout against `state` and returns the persisted order.
///
/// # Errors
/// - `Validation` for a blank location, an empty item list, or a negative discount
/// - `EmptyOrder` when no item survives the stock checks
/// - `Promo` when a given promo code is refused for the surviving subtotal
#[instrument(skip(state, request), fields(buyer_id = request.buyer_id, requested = request.items.len()))]
pub fn place_order(state: &mut ShopState, request: &NewOrder, now: DateTime<Utc>) -> Result<Order, ShopError> {
    validate_request(request)?;

    // Step 1: partial fulfillment
    let items = select_items(&state.catalog, &request.items);

    // Step 2: reject when nothing is left
    let subtotal = items_subtotal(&items)?;
    if items.is_empty() || subtotal == 0 {
        warn!("No items available for the order");
        return Err(ShopError::EmptyOrder);
    }

    // Step 3: discount
    let promo_code = non_blank(&request.promo_code).map(|c| c.to_uppercase());
    let discount_amount = match &promo_code {
        Some(code) => state.promos.redeem(code, subtotal, now)?,
        None => request.discount_amount.unwrap_or(0).min(subtotal),
    };

    // Step 4: stock, then the order row
    for item in &items {
        state.catalog.reserve(item.product_id, item.quantity)?;
    }
    let order = state.orders.insert(OrderCreate {
        user_id: request.buyer_id,
        location: request.location.trim().to_string(),
        items,
        discount_amount,
        notes: non_blank(&request.notes),
        delivery_slot: non_blank(&request.delivery_slot),
        promo_code,
        created_at: now,
    })?;

    // Step 5: the cart goes regardless of where the items came from
    state.carts.clear(request.buyer_id);

    info!(order_id = order.id, total = order.total, items = order.items.len(), "Order created");
    Ok(order)
}
