#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use crate::app_system::ShopSystem;
    use crate::clients::OrderClient;
    use crate::config::Config;
    use crate::domain::{
        CheckoutOptions, NewOrder, Order, OrderItemRequest, OrderRecord, OrderStatus, PromoOutcome, StatusChange,
    };
    use crate::error::{PromoError, ShopError};
    use crate::mock_framework::{
        create_mock_dispatcher, create_mock_store, expect_create_order, expect_set_status, RecordingNotifier,
    };
    use crate::notify::OrderEvent;
    use crate::store::JsonFileStorage;

    fn record(id: i64, status: OrderStatus) -> OrderRecord {
        OrderRecord {
            order: Order {
                id,
                user_id: 42,
                location: "Dorm 3".into(),
                items: vec![],
                subtotal: 300,
                discount_amount: 0,
                total: 300,
                status,
                notes: None,
                delivery_slot: None,
                promo_code: None,
                created_at: Utc::now(),
            },
            user_name: None,
            user_username: None,
        }
    }

    fn vanilla(quantity: i64) -> NewOrder {
        NewOrder::new(42, "Dorm 3", vec![OrderItemRequest { id: 1, quantity }])
    }

    async fn shop() -> (ShopSystem, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let config = Config {
            admin_ids: vec![1],
            ..Config::default()
        };
        let system = ShopSystem::start(&config, notifier.clone()).await.unwrap();
        system
            .catalog_client
            .upsert_product("Vanilla".into(), 100, 5)
            .await
            .unwrap();
        (system, notifier)
    }

    // --- Client orchestration against a mocked store ---

    #[tokio::test]
    async fn test_order_creation_notifies_staff_after_commit() {
        let (sender, mut store_rx) = create_mock_store(10);
        let (dispatcher, mut events) = create_mock_dispatcher(vec![1, 2]);
        let order_client = OrderClient::new(sender, dispatcher);

        // 1. A rejected order notifies nobody
        let client = order_client.clone();
        let rejected = tokio::spawn(async move { client.create_order(vanilla(10)).await });
        let (_, responder) = expect_create_order(&mut store_rx).await.expect("Expected CreateOrder");
        responder.send(Err(ShopError::EmptyOrder)).unwrap();
        assert_eq!(rejected.await.unwrap(), Err(ShopError::EmptyOrder));

        // 2. An accepted one reaches every staff member
        let client = order_client.clone();
        let accepted = tokio::spawn(async move { client.create_order(vanilla(3)).await });
        let (payload, responder) = expect_create_order(&mut store_rx).await.expect("Expected CreateOrder");
        assert_eq!(payload.items[0].quantity, 3);
        responder.send(Ok(record(7, OrderStatus::Pending))).unwrap();
        assert_eq!(accepted.await.unwrap(), Ok(7));

        let (first, event) = events.recv().await.unwrap();
        assert_eq!(first, 1);
        assert!(matches!(event, OrderEvent::NewOrder { ref order } if order.order.id == 7));
        assert_eq!(events.recv().await.unwrap().0, 2);
    }

    #[tokio::test]
    async fn test_repeated_status_is_not_announced_twice() {
        let (sender, mut store_rx) = create_mock_store(10);
        let (dispatcher, mut events) = create_mock_dispatcher(vec![1]);
        let order_client = OrderClient::new(sender, dispatcher);

        // Same status again: stored, not announced
        let client = order_client.clone();
        let repeat = tokio::spawn(async move { client.set_status(7, OrderStatus::Pending).await });
        let (id, status, responder) = expect_set_status(&mut store_rx).await.expect("Expected SetOrderStatus");
        assert_eq!((id, status), (7, OrderStatus::Pending));
        responder
            .send(Ok(Some(StatusChange {
                previous: OrderStatus::Pending,
                record: record(7, OrderStatus::Pending),
            })))
            .unwrap();
        assert!(repeat.await.unwrap().unwrap().is_some());

        // A real change goes to staff and the buyer
        let client = order_client.clone();
        let change = tokio::spawn(async move { client.set_status(7, OrderStatus::Confirmed).await });
        let (_, _, responder) = expect_set_status(&mut store_rx).await.expect("Expected SetOrderStatus");
        responder
            .send(Ok(Some(StatusChange {
                previous: OrderStatus::Pending,
                record: record(7, OrderStatus::Confirmed),
            })))
            .unwrap();
        change.await.unwrap().unwrap();

        let (recipient, event) = events.recv().await.unwrap();
        assert_eq!(recipient, 1);
        assert!(matches!(event, OrderEvent::OrderStatusUpdate { status: OrderStatus::Confirmed, .. }));
        assert_eq!(events.recv().await.unwrap().0, 42);
    }

    #[tokio::test]
    async fn test_unknown_order_status_is_none() {
        let (sender, mut store_rx) = create_mock_store(10);
        let (dispatcher, _events) = create_mock_dispatcher(vec![1]);
        let order_client = OrderClient::new(sender, dispatcher);

        let task = tokio::spawn(async move { order_client.set_status(404, OrderStatus::Cancelled).await });
        let (_, _, responder) = expect_set_status(&mut store_rx).await.expect("Expected SetOrderStatus");
        responder.send(Ok(None)).unwrap();
        assert_eq!(task.await.unwrap(), Ok(None));
    }

    // --- Whole system ---

    #[tokio::test]
    async fn test_order_takes_stock_and_totals() {
        let (system, _) = shop().await;

        let order_id = system.order_client.create_order(vanilla(3)).await.unwrap();

        let order = system.order_client.get_order(order_id).await.unwrap().unwrap().order;
        assert_eq!(order.total, 300);
        assert_eq!(order.status, OrderStatus::Pending);
        let product = system.catalog_client.get_product(1).await.unwrap().unwrap();
        assert_eq!(product.quantity, 2);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_order_over_stock_creates_nothing() {
        let (system, notifier) = shop().await;

        let result = system.order_client.create_order(vanilla(10)).await;
        assert_eq!(result, Err(ShopError::EmptyOrder));

        assert_eq!(system.catalog_client.get_product(1).await.unwrap().unwrap().quantity, 5);
        assert!(system.order_client.list_all().await.unwrap().is_empty());
        assert!(notifier.delivered().is_empty());

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_promo_checks() {
        let (system, _) = shop().await;

        assert_eq!(
            system.promo_client.validate("WELCOME10".into(), 300).await,
            Ok(PromoOutcome::Discount { discount: 30 })
        );
        assert_eq!(
            system.promo_client.validate("welcome10".into(), 50).await,
            Ok(PromoOutcome::BelowMinimum { min_order: 100 })
        );
        assert_eq!(
            system.promo_client.validate("MISSING".into(), 500).await,
            Err(ShopError::Promo(PromoError::NotFound("MISSING".into())))
        );

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_promo_order_redeems_one_use() {
        let (system, _) = shop().await;

        let order_id = system
            .order_client
            .create_order(vanilla(3).with_promo("welcome10"))
            .await
            .unwrap();

        let order = system.order_client.get_order(order_id).await.unwrap().unwrap().order;
        assert_eq!(order.discount_amount, 30);
        assert_eq!(order.total, 270);
        assert_eq!(order.promo_code.as_deref(), Some("WELCOME10"));
        let promos = system.promo_client.list_promos().await.unwrap();
        let welcome = promos.iter().find(|p| p.code == "WELCOME10").unwrap();
        assert_eq!(welcome.uses_left, 998);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_orders_never_oversell() {
        let (system, _) = shop().await;

        let first = system.order_client.clone();
        let second = system.order_client.clone();
        let (a, b) = tokio::join!(first.create_order(vanilla(3)), second.create_order(vanilla(3)));

        // One order wins outright, the other finds only 2 left and is dropped
        assert!(a.is_ok() != b.is_ok());
        let loser = if a.is_ok() { b } else { a };
        assert_eq!(loser, Err(ShopError::EmptyOrder));

        let orders = system.order_client.list_all().await.unwrap();
        let sold: i64 = orders.iter().flat_map(|r| &r.order.items).map(|i| i.quantity).sum();
        let left = system.catalog_client.get_product(1).await.unwrap().unwrap().quantity;
        assert_eq!(sold, 3);
        assert_eq!(sold + left, 5);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_line_items_ignore_later_catalog_edits() {
        let (system, _) = shop().await;
        let order_id = system.order_client.create_order(vanilla(1)).await.unwrap();

        system
            .catalog_client
            .update_product(1, "Vanilla Bean".into(), 180, 4)
            .await
            .unwrap();
        system.catalog_client.delete_product(1).await.unwrap();

        let item = &system.order_client.get_order(order_id).await.unwrap().unwrap().order.items[0];
        assert_eq!(item.product_name, "Vanilla");
        assert_eq!(item.price, 100);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cart_checkout_clears_the_cart() {
        let (system, _) = shop().await;
        system
            .user_client
            .register_user(42, "Alice".into(), Some("alice".into()))
            .await
            .unwrap();
        system.cart_client.add_to_cart(42, 1, 2).await.unwrap();

        let order_id = system
            .order_client
            .checkout_cart(42, "Dorm 3".into(), CheckoutOptions::default())
            .await
            .unwrap();

        assert!(system.cart_client.get_cart(42).await.unwrap().is_empty());
        let history = system.order_client.user_orders(42).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].order.id, order_id);
        assert_eq!(history[0].user_name.as_deref(), Some("Alice"));

        let pending = system.order_client.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);

        system.order_client.set_status(order_id, OrderStatus::Cancelled).await.unwrap();
        assert!(system.order_client.list_active().await.unwrap().is_empty());
        assert_eq!(system.order_client.list_cancelled().await.unwrap().len(), 1);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_survives_restart_and_ids_keep_growing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.json");
        let config = Config::default();

        let system = ShopSystem::with_storage(
            &config,
            Arc::new(JsonFileStorage::new(&path)),
            Arc::new(RecordingNotifier::default()),
        )
        .await
        .unwrap();
        system.catalog_client.upsert_product("Vanilla".into(), 100, 5).await.unwrap();
        system.order_client.create_order(vanilla(2)).await.unwrap();
        system.catalog_client.delete_product(1).await.unwrap();
        system.shutdown().await.unwrap();

        let system = ShopSystem::with_storage(
            &config,
            Arc::new(JsonFileStorage::new(&path)),
            Arc::new(RecordingNotifier::default()),
        )
        .await
        .unwrap();
        assert!(system.catalog_client.list_available().await.unwrap().is_empty());
        let product = system.catalog_client.upsert_product("Mango".into(), 250, 4).await.unwrap();
        assert_eq!(product.id, 2);

        let restocked = system.catalog_client.upsert_product("Vanilla".into(), 110, 3).await.unwrap();
        assert_eq!(restocked.id, 1);
        assert!(restocked.is_available);

        let order_id = system
            .order_client
            .create_order(NewOrder::new(42, "Dorm 3", vec![OrderItemRequest { id: 2, quantity: 1 }]))
            .await
            .unwrap();
        assert_eq!(order_id, 2);

        let stats = system.order_client.stats().await.unwrap();
        assert_eq!(stats.order_count, 2);
        let csv = system.order_client.export_orders().await.unwrap();
        assert_eq!(csv.lines().count(), 3);

        system.shutdown().await.unwrap();
    }
}
