use tracing::{info, instrument};

use crate::domain::{Order, OrderFilter, OrderRecord, OrderStatus, StatusChange};
use crate::error::ShopError;
use crate::users::Directory;

use super::{OrderAction, OrderBook};

/// Joins an order with its buyer's display fields.
pub fn to_record(order: &Order, users: &Directory) -> OrderRecord {
    let user = users.get(order.user_id);
    OrderRecord {
        order: order.clone(),
        user_name: user.map(|u| u.first_name.clone()),
        user_username: user.and_then(|u| u.username.clone()),
    }
}

impl OrderBook {
    /// Overwrites the status without any transition guard. `Ok(None)` when
    /// the order does not exist.
    #[instrument(skip(self, users))]
    pub fn set_status(
        &mut self,
        order_id: i64,
        status: OrderStatus,
        users: &Directory,
    ) -> Result<Option<StatusChange>, ShopError> {
        if !self.orders.contains(&order_id) {
            return Ok(None);
        }
        let previous = self.orders.perform_action(&order_id, OrderAction::SetStatus(status))?;
        info!(%previous, %status, "Order status set");

        Ok(self.get(order_id).map(|order| StatusChange {
            previous,
            record: to_record(order, users),
        }))
    }

    pub fn list(&self, filter: OrderFilter, users: &Directory) -> Vec<OrderRecord> {
        self.newest_first()
            .into_iter()
            .filter(|order| filter.matches(order.status))
            .map(|order| to_record(order, users))
            .collect()
    }

    pub fn list_pending(&self, users: &Directory) -> Vec<OrderRecord> {
        self.list(OrderFilter::Pending, users)
    }

    pub fn list_active(&self, users: &Directory) -> Vec<OrderRecord> {
        self.list(OrderFilter::Active, users)
    }

    pub fn list_cancelled(&self, users: &Directory) -> Vec<OrderRecord> {
        self.list(OrderFilter::Cancelled, users)
    }

    pub fn list_all(&self, users: &Directory) -> Vec<OrderRecord> {
        self.list(OrderFilter::All, users)
    }

    /// Order history of one buyer, newest first.
    pub fn list_for_user(&self, user_id: i64, users: &Directory) -> Vec<OrderRecord> {
        self.newest_first()
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .map(|order| to_record(order, users))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, OrderCreate};
    use chrono::{Duration, Utc};

    fn book() -> (OrderBook, Directory) {
        let mut users = Directory::default();
        let start = Utc::now();
        users.register(1, "Alice", Some("alice"), start).unwrap();

        let mut book = OrderBook::default();
        for (minutes, user_id) in [(0, 1), (10, 2), (20, 1)] {
            book.insert(OrderCreate {
                user_id,
                location: "Dorm 3".into(),
                items: vec![LineItem {
                    product_id: 1,
                    product_name: "Vanilla".into(),
                    quantity: 1,
                    price: 100,
                }],
                discount_amount: 0,
                notes: None,
                delivery_slot: None,
                promo_code: None,
                created_at: start + Duration::minutes(minutes),
            })
            .unwrap();
        }
        (book, users)
    }

    #[test]
    fn test_all_states_are_mutually_reachable() {
        let (mut book, users) = book();
        let path = [
            OrderStatus::Confirmed,
            OrderStatus::Cancelled,
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Pending,
        ];
        for status in path {
            let change = book.set_status(1, status, &users).unwrap().unwrap();
            assert_eq!(change.record.order.status, status);
        }
    }

    #[test]
    fn test_set_status_reports_previous_and_buyer() {
        let (mut book, users) = book();
        let change = book.set_status(1, OrderStatus::Confirmed, &users).unwrap().unwrap();
        assert_eq!(change.previous, OrderStatus::Pending);
        assert!(change.changed());
        assert_eq!(change.record.user_name.as_deref(), Some("Alice"));

        let again = book.set_status(1, OrderStatus::Confirmed, &users).unwrap().unwrap();
        assert!(!again.changed());
        assert_eq!(again.record.order.status, OrderStatus::Confirmed);
    }

    #[test]
    fn test_set_status_on_unknown_order() {
        let (mut book, users) = book();
        assert_eq!(book.set_status(99, OrderStatus::Cancelled, &users).unwrap(), None);
    }

    #[test]
    fn test_filtered_listings_are_newest_first() {
        let (mut book, users) = book();
        book.set_status(2, OrderStatus::Confirmed, &users).unwrap();
        book.set_status(3, OrderStatus::Cancelled, &users).unwrap();

        let ids = |records: Vec<OrderRecord>| records.into_iter().map(|r| r.order.id).collect::<Vec<_>>();
        assert_eq!(ids(book.list_all(&users)), vec![3, 2, 1]);
        assert_eq!(ids(book.list_pending(&users)), vec![1]);
        assert_eq!(ids(book.list_active(&users)), vec![2, 1]);
        assert_eq!(ids(book.list_cancelled(&users)), vec![3]);
        assert_eq!(ids(book.list_for_user(1, &users)), vec![3, 1]);
    }

    #[test]
    fn test_unknown_buyer_has_no_display_info() {
        let (book, users) = book();
        let record = book.list_for_user(2, &users).remove(0);
        assert_eq!(record.user_name, None);
        assert_eq!(record.user_username, None);
    }
}
