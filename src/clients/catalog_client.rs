use tokio::sync::mpsc;

use crate::domain::Product;
use crate::messages::StoreRequest;

/// Client for the catalog tables.
#[derive(Clone)]
pub struct CatalogClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl CatalogClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }
}

client_method!(CatalogClient => pub fn list_available() -> Vec<Product> as StoreRequest::ListAvailable);
client_method!(CatalogClient => pub fn list_for_admin() -> Vec<Product> as StoreRequest::ListForAdmin);
client_method!(CatalogClient => pub fn get_product(id: i64) -> Option<Product> as StoreRequest::GetProduct);
client_method!(CatalogClient => pub fn upsert_product(name: String, price: i64, quantity: i64) -> Product as StoreRequest::UpsertProduct);
client_method!(CatalogClient => pub fn update_product(id: i64, name: String, price: i64, quantity: i64) -> Product as StoreRequest::UpdateProduct);
client_method!(CatalogClient => pub fn set_quantity(id: i64, quantity: i64) -> Product as StoreRequest::SetQuantity);
client_method!(CatalogClient => pub fn delete_product(id: i64) -> Product as StoreRequest::DeleteProduct);
