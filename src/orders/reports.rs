use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{OrderRecord, OrderStatus};
use crate::users::Directory;

use super::{lifecycle::to_record, OrderBook};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_name: String,
    pub quantity: i64,
    pub revenue: i64,
}

/// Staff dashboard numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopStats {
    pub order_count: usize,
    pub orders_by_status: BTreeMap<String, usize>,
    /// Sum of totals of confirmed and completed orders
    pub revenue: i64,
    pub average_check: i64,
    pub top_products: Vec<ProductSales>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub username: Option<String>,
    pub order_count: usize,
    pub total_spent: i64,
}

const TOP_PRODUCTS: usize = 5;

fn counts_as_revenue(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Confirmed | OrderStatus::Completed)
}

impl OrderBook {
    pub fn stats(&self) -> ShopStats {
        let mut orders_by_status: BTreeMap<String, usize> =
            OrderStatus::ALL.iter().map(|s| (s.to_string(), 0)).collect();
        let mut sales: BTreeMap<String, ProductSales> = BTreeMap::new();
        let mut revenue: i64 = 0;
        let mut paid_orders = 0;

        for order in self.orders.values() {
            *orders_by_status.entry(order.status.to_string()).or_default() += 1;
            if !counts_as_revenue(order.status) {
                continue;
            }
            revenue = revenue.saturating_add(order.total);
            paid_orders += 1;
            for item in &order.items {
                let entry = sales.entry(item.product_name.clone()).or_insert_with(|| ProductSales {
                    product_name: item.product_name.clone(),
                    quantity: 0,
                    revenue: 0,
                });
                entry.quantity = entry.quantity.saturating_add(item.quantity);
                entry.revenue = entry.revenue.saturating_add(item.line_total().unwrap_or(i64::MAX));
            }
        }

        let mut top_products: Vec<ProductSales> = sales.into_values().collect();
        top_products.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.product_name.cmp(&b.product_name)));
        top_products.truncate(TOP_PRODUCTS);

        ShopStats {
            order_count: self.orders.len(),
            orders_by_status,
            revenue,
            average_check: if paid_orders == 0 { 0 } else { revenue / paid_orders },
            top_products,
        }
    }

    /// Every buyer with at least one order, biggest spenders first. Cancelled
    /// orders count towards `order_count` but not towards spend.
    pub fn customers(&self, users: &Directory) -> Vec<CustomerSummary> {
        let mut by_user: BTreeMap<i64, CustomerSummary> = BTreeMap::new();
        for order in self.orders.values() {
            let entry = by_user.entry(order.user_id).or_insert_with(|| {
                let user = users.get(order.user_id);
                CustomerSummary {
                    user_id: order.user_id,
                    first_name: user.map(|u| u.first_name.clone()),
                    username: user.and_then(|u| u.username.clone()),
                    order_count: 0,
                    total_spent: 0,
                }
            });
            entry.order_count += 1;
            if order.status != OrderStatus::Cancelled {
                entry.total_spent = entry.total_spent.saturating_add(order.total);
            }
        }
        let mut customers: Vec<CustomerSummary> = by_user.into_values().collect();
        customers.sort_by(|a, b| b.total_spent.cmp(&a.total_spent).then(a.user_id.cmp(&b.user_id)));
        customers
    }

    pub fn records(&self, users: &Directory) -> Vec<OrderRecord> {
        self.newest_first().into_iter().map(|o| to_record(o, users)).collect()
    }
}

fn csv_field(value: &str) -> String {
    value.replace([',', '\n', '\r'], " ")
}

/// `id,user_id,user_name,location,total,status,created_at`, one order per line.
pub fn export_csv(records: &[OrderRecord]) -> String {
    let mut lines = vec!["id,user_id,user_name,location,total,status,created_at".to_string()];
    for record in records {
        let order = &record.order;
        lines.push(format!(
            "{},{},{},{},{},{},{}",
            order.id,
            order.user_id,
            csv_field(record.user_name.as_deref().unwrap_or_default()),
            csv_field(&order.location),
            order.total,
            order.status,
            order.created_at.to_rfc3339(),
        ));
    }
    lines.join("\n")
}
