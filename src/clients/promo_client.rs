use tokio::sync::mpsc;

use crate::domain::{PromoCode, PromoCreate, PromoOutcome};
use crate::messages::StoreRequest;

/// Client for promo code checks and staff edits.
#[derive(Clone)]
pub struct PromoClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl PromoClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }
}

client_method!(PromoClient => pub fn validate(code: String, subtotal: i64) -> PromoOutcome as StoreRequest::ValidatePromo);
client_method!(PromoClient => pub fn upsert_promo(code: String, terms: PromoCreate) -> PromoCode as StoreRequest::UpsertPromo);
client_method!(PromoClient => pub fn list_promos() -> Vec<PromoCode> as StoreRequest::ListPromos);
