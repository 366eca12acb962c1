use tokio::sync::oneshot;

use crate::domain::{
    CartLine, CheckoutOptions, NewOrder, OrderFilter, OrderRecord, OrderStatus, Product, PromoCode, PromoCreate,
    PromoOutcome, StatusChange, User,
};
use crate::error::ShopError;
use crate::orders::{CustomerSummary, ShopStats};

/// Generic type aliases for service communication
pub type ServiceResult<T> = std::result::Result<T, ShopError>;
pub type ServiceResponse<T> = oneshot::Sender<ServiceResult<T>>;

/// Typed requests for the store actor. Each variant carries its own payload
/// and a oneshot channel for the response.
#[derive(Debug)]
pub enum StoreRequest {
    // --- Catalog ---
    ListAvailable {
        respond_to: ServiceResponse<Vec<Product>>,
    },
    ListForAdmin {
        respond_to: ServiceResponse<Vec<Product>>,
    },
    GetProduct {
        id: i64,
        respond_to: ServiceResponse<Option<Product>>,
    },
    UpsertProduct {
        name: String,
        price: i64,
        quantity: i64,
        respond_to: ServiceResponse<Product>,
    },
    UpdateProduct {
        id: i64,
        name: String,
        price: i64,
        quantity: i64,
        respond_to: ServiceResponse<Product>,
    },
    SetQuantity {
        id: i64,
        quantity: i64,
        respond_to: ServiceResponse<Product>,
    },
    DeleteProduct {
        id: i64,
        respond_to: ServiceResponse<Product>,
    },

    // --- Promo ---
    ValidatePromo {
        code: String,
        subtotal: i64,
        respond_to: ServiceResponse<PromoOutcome>,
    },
    UpsertPromo {
        code: String,
        terms: PromoCreate,
        respond_to: ServiceResponse<PromoCode>,
    },
    ListPromos {
        respond_to: ServiceResponse<Vec<PromoCode>>,
    },

    // --- Users ---
    RegisterUser {
        id: i64,
        first_name: String,
        username: Option<String>,
        respond_to: ServiceResponse<User>,
    },
    GetUser {
        id: i64,
        respond_to: ServiceResponse<Option<User>>,
    },

    // --- Cart ---
    AddToCart {
        user_id: i64,
        product_id: i64,
        quantity: i64,
        respond_to: ServiceResponse<()>,
    },
    UpdateCart {
        user_id: i64,
        product_id: i64,
        change: i64,
        respond_to: ServiceResponse<bool>,
    },
    GetCart {
        user_id: i64,
        respond_to: ServiceResponse<Vec<CartLine>>,
    },
    ClearCart {
        user_id: i64,
        respond_to: ServiceResponse<()>,
    },

    // --- Orders ---
    CreateOrder {
        order: NewOrder,
        respond_to: ServiceResponse<OrderRecord>,
    },
    CheckoutCart {
        user_id: i64,
        location: String,
        options: CheckoutOptions,
        respond_to: ServiceResponse<OrderRecord>,
    },
    SetOrderStatus {
        id: i64,
        status: OrderStatus,
        respond_to: ServiceResponse<Option<StatusChange>>,
    },
    GetOrder {
        id: i64,
        respond_to: ServiceResponse<Option<OrderRecord>>,
    },
    ListOrders {
        filter: OrderFilter,
        respond_to: ServiceResponse<Vec<OrderRecord>>,
    },
    UserOrders {
        user_id: i64,
        respond_to: ServiceResponse<Vec<OrderRecord>>,
    },
    Stats {
        respond_to: ServiceResponse<ShopStats>,
    },
    Customers {
        respond_to: ServiceResponse<Vec<CustomerSummary>>,
    },
    ExportOrders {
        respond_to: ServiceResponse<String>,
    },

    Shutdown,
    #[cfg(test)]
    Snapshot {
        respond_to: ServiceResponse<crate::store::ShopState>,
    },
}
