use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A buyer or staff member, keyed by chat identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for the first contact of a user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub first_name: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Display fields refreshed on every later contact.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub first_name: String,
    pub username: Option<String>,
}
