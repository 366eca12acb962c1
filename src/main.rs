use std::sync::Arc;

use tracing::{error, info, Instrument};

use storefront::app_system::{setup_tracing, ShopSystem};
use storefront::config::Config;
use storefront::domain::{NewOrder, OrderItemRequest, OrderStatus};
use storefront::error::ShopError;
use storefront::notify::LogNotifier;

#[tokio::main]
async fn main() -> Result<(), ShopError> {
    let config = Config::from_env();

    // Setup tracing once for the entire application
    setup_tracing(&config.log_level);

    info!(storage = ?config.data_path, "Starting storefront");

    let system = ShopSystem::start(&config, Arc::new(LogNotifier)).await?;

    // Register a buyer
    let buyer = system
        .user_client
        .register_user(1001, "Alice".to_string(), Some("alice".to_string()))
        .await?;
    info!(user_id = buyer.id, "Buyer registered");

    // Stock a product
    let product = system
        .catalog_client
        .upsert_product("Vanilla Ice Cream".to_string(), 150, 10)
        .await?;
    info!(product_id = product.id, quantity = product.quantity, "Product stocked");

    // Place an order through the transaction path
    let order = NewOrder::new(
        buyer.id,
        "Dorm 3, room 12",
        vec![OrderItemRequest {
            id: product.id,
            quantity: 2,
        }],
    )
    .with_promo("WELCOME10");

    let span = tracing::info_span!("order_processing");
    let order_result = async {
        info!("Processing order");
        system.order_client.create_order(order).await
    }
    .instrument(span)
    .await;

    match order_result {
        Ok(order_id) => {
            info!(order_id, "Order processed successfully");
            if let Some(record) = system.order_client.set_status(order_id, OrderStatus::Confirmed).await? {
                info!(order_id, status = %record.order.status, total = record.order.total, "Order confirmed");
            }
        }
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    let stats = system.order_client.stats().await?;
    info!(orders = stats.order_count, revenue = stats.revenue, "Shop totals");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
