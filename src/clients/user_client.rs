use tokio::sync::mpsc;

use crate::domain::User;
use crate::messages::StoreRequest;

/// Client for the buyer directory.
#[derive(Clone)]
pub struct UserClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl UserClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }
}

client_method!(UserClient => pub fn register_user(id: i64, first_name: String, username: Option<String>) -> User as StoreRequest::RegisterUser);
client_method!(UserClient => pub fn get_user(id: i64) -> Option<User> as StoreRequest::GetUser);
