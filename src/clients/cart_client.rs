use tokio::sync::mpsc;

use crate::domain::CartLine;
use crate::messages::StoreRequest;

/// Client for buyer carts.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }
}

client_method!(CartClient => pub fn add_to_cart(user_id: i64, product_id: i64, quantity: i64) -> () as StoreRequest::AddToCart);
client_method!(CartClient => pub fn update_cart(user_id: i64, product_id: i64, change: i64) -> bool as StoreRequest::UpdateCart);
client_method!(CartClient => pub fn get_cart(user_id: i64) -> Vec<CartLine> as StoreRequest::GetCart);
client_method!(CartClient => pub fn clear_cart(user_id: i64) -> () as StoreRequest::ClearCart);
