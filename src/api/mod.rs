//! Versioned JSON boundary.
//!
//! Callers (the chat bot, the web mini-app) send
//! `{"version": 1, "action": "<name>", ...payload}`. The envelope is checked
//! and the payload parsed into a [`Command`] before anything reaches the
//! store; malformed input fails with [`ShopError::Validation`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::app_system::ShopSystem;
use crate::domain::{
    CartLine, CheckoutOptions, NewOrder, OrderFilter, OrderRecord, OrderStatus, Product, PromoOutcome, User,
};
use crate::error::ShopError;
use crate::orders::transaction::validate_request;
use crate::orders::{CustomerSummary, ShopStats};

pub const SCHEMA_VERSION: u64 = 1;

/// Outgoing request, as a caller would build it.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    pub version: u64,
    #[serde(flatten)]
    pub command: Command,
}

impl RequestEnvelope {
    pub fn new(command: Command) -> Self {
        Self {
            version: SCHEMA_VERSION,
            command,
        }
    }
}

/// Every action the boundary accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    ListProducts,
    ListAdminProducts,
    UpsertProduct {
        name: String,
        price: i64,
        quantity: i64,
    },
    UpdateProduct {
        id: i64,
        name: String,
        price: i64,
        quantity: i64,
    },
    SetStock {
        id: i64,
        quantity: i64,
    },
    DeleteProduct {
        id: i64,
    },
    CreateOrder(NewOrder),
    CheckoutCart {
        user_id: i64,
        location: String,
        #[serde(default)]
        notes: Option<String>,
        #[serde(default)]
        delivery_slot: Option<String>,
        #[serde(default)]
        promo_code: Option<String>,
    },
    SetOrderStatus {
        id: i64,
        status: OrderStatus,
    },
    ListOrders {
        #[serde(default)]
        filter: Option<OrderFilter>,
    },
    UserOrders {
        user_id: i64,
    },
    ValidatePromo {
        code: String,
        subtotal: i64,
    },
    RegisterUser {
        id: i64,
        first_name: String,
        #[serde(default)]
        username: Option<String>,
    },
    AddToCart {
        user_id: i64,
        product_id: i64,
        quantity: i64,
    },
    UpdateCart {
        user_id: i64,
        product_id: i64,
        change: i64,
    },
    GetCart {
        user_id: i64,
    },
    Analytics,
    Customers,
    ExportOrders,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::ListProducts => "list_products",
            Command::ListAdminProducts => "list_admin_products",
            Command::UpsertProduct { .. } => "upsert_product",
            Command::UpdateProduct { .. } => "update_product",
            Command::SetStock { .. } => "set_stock",
            Command::DeleteProduct { .. } => "delete_product",
            Command::CreateOrder(_) => "create_order",
            Command::CheckoutCart { .. } => "checkout_cart",
            Command::SetOrderStatus { .. } => "set_order_status",
            Command::ListOrders { .. } => "list_orders",
            Command::UserOrders { .. } => "user_orders",
            Command::ValidatePromo { .. } => "validate_promo",
            Command::RegisterUser { .. } => "register_user",
            Command::AddToCart { .. } => "add_to_cart",
            Command::UpdateCart { .. } => "update_cart",
            Command::GetCart { .. } => "get_cart",
            Command::Analytics => "analytics",
            Command::Customers => "customers",
            Command::ExportOrders => "export_orders",
        }
    }

    /// Shape checks that need no shop state.
    pub fn validate(&self) -> Result<(), ShopError> {
        match self {
            Command::CreateOrder(order) => validate_request(order)?,
            Command::CheckoutCart { location, .. } if location.trim().is_empty() => {
                return Err(ShopError::validation("Location is required"));
            }
            Command::ValidatePromo { code, subtotal } => {
                if code.trim().is_empty() {
                    return Err(ShopError::validation("Promo code is required"));
                }
                if *subtotal < 0 {
                    return Err(ShopError::validation("Subtotal cannot be negative"));
                }
            }
            Command::RegisterUser { first_name, .. } if first_name.trim().is_empty() => {
                return Err(ShopError::validation("First name is required"));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Answer to a promo check, in the shape the mini-app renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromoCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PromoCheck {
    fn accepted(discount: i64) -> Self {
        Self {
            valid: true,
            discount: Some(discount),
            error: None,
        }
    }

    fn rejected(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            discount: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reply", content = "data", rename_all = "snake_case")]
pub enum Reply {
    Products(Vec<Product>),
    Product(Product),
    OrderCreated { order_id: i64 },
    Order(Option<OrderRecord>),
    Orders(Vec<OrderRecord>),
    Promo(PromoCheck),
    User(User),
    Cart(Vec<CartLine>),
    /// `updated` is false when the user had no such cart line.
    CartUpdated { updated: bool },
    Analytics(ShopStats),
    Customers(Vec<CustomerSummary>),
    Csv(String),
}

/// Checks the envelope and parses the payload.
pub fn parse_request(raw: &str) -> Result<Command, ShopError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ShopError::validation(format!("Malformed request: {}", e)))?;

    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| ShopError::validation("Missing schema version"))?;
    if version != SCHEMA_VERSION {
        return Err(ShopError::validation(format!("Unsupported schema version: {}", version)));
    }

    let command = Command::deserialize(value).map_err(|e| ShopError::validation(format!("Invalid payload: {}", e)))?;
    command.validate()?;
    Ok(command)
}

impl ShopSystem {
    /// Parses, dispatches, and wraps the outcome in a versioned reply object.
    #[instrument(skip(self, raw))]
    pub async fn handle_json(&self, raw: &str) -> Value {
        match self.handle(raw).await {
            Ok(reply) => json!({ "version": SCHEMA_VERSION, "ok": true, "reply": reply }),
            Err(e) => {
                warn!(error = %e, "Request failed");
                json!({
                    "version": SCHEMA_VERSION,
                    "ok": false,
                    "error": { "kind": e.kind(), "message": e.to_string() },
                })
            }
        }
    }

    pub async fn handle(&self, raw: &str) -> Result<Reply, ShopError> {
        let command = parse_request(raw)?;
        self.dispatch(command).await
    }

    #[instrument(skip(self, command), fields(action = command.name()))]
    pub async fn dispatch(&self, command: Command) -> Result<Reply, ShopError> {
        debug!("Dispatching");
        let reply = match command {
            Command::ListProducts => Reply::Products(self.catalog_client.list_available().await?),
            Command::ListAdminProducts => Reply::Products(self.catalog_client.list_for_admin().await?),
            Command::UpsertProduct { name, price, quantity } => {
                Reply::Product(self.catalog_client.upsert_product(name, price, quantity).await?)
            }
            Command::UpdateProduct { id, name, price, quantity } => {
                Reply::Product(self.catalog_client.update_product(id, name, price, quantity).await?)
            }
            Command::SetStock { id, quantity } => Reply::Product(self.catalog_client.set_quantity(id, quantity).await?),
            Command::DeleteProduct { id } => Reply::Product(self.catalog_client.delete_product(id).await?),
            Command::CreateOrder(order) => Reply::OrderCreated {
                order_id: self.order_client.create_order(order).await?,
            },
            Command::CheckoutCart {
                user_id,
                location,
                notes,
                delivery_slot,
                promo_code,
            } => {
                let options = CheckoutOptions {
                    notes,
                    delivery_slot,
                    promo_code,
                };
                Reply::OrderCreated {
                    order_id: self.order_client.checkout_cart(user_id, location, options).await?,
                }
            }
            Command::SetOrderStatus { id, status } => Reply::Order(self.order_client.set_status(id, status).await?),
            Command::ListOrders { filter } => {
                Reply::Orders(self.order_client.list_orders(filter.unwrap_or(OrderFilter::All)).await?)
            }
            Command::UserOrders { user_id } => Reply::Orders(self.order_client.user_orders(user_id).await?),
            Command::ValidatePromo { code, subtotal } => match self.promo_client.validate(code, subtotal).await {
                Ok(PromoOutcome::Discount { discount }) => Reply::Promo(PromoCheck::accepted(discount)),
                Ok(PromoOutcome::BelowMinimum { min_order }) => {
                    Reply::Promo(PromoCheck::rejected(format!("Minimum order for this code is {}", min_order)))
                }
                Err(ShopError::Promo(e)) => Reply::Promo(PromoCheck::rejected(e.to_string())),
                Err(e) => return Err(e),
            },
            Command::RegisterUser { id, first_name, username } => {
                Reply::User(self.user_client.register_user(id, first_name, username).await?)
            }
            Command::AddToCart { user_id, product_id, quantity } => {
                self.cart_client.add_to_cart(user_id, product_id, quantity).await?;
                Reply::Cart(self.cart_client.get_cart(user_id).await?)
            }
            Command::UpdateCart { user_id, product_id, change } => Reply::CartUpdated {
                updated: self.cart_client.update_cart(user_id, product_id, change).await?,
            },
            Command::GetCart { user_id } => Reply::Cart(self.cart_client.get_cart(user_id).await?),
            Command::Analytics => Reply::Analytics(self.order_client.stats().await?),
            Command::Customers => Reply::Customers(self.order_client.customers().await?),
            Command::ExportOrders => Reply::Csv(self.order_client.export_orders().await?),
        };
        Ok(reply)
    }
}
