//! Buyer directory, filled in on first contact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::actor_framework::{Entity, Table};
use crate::domain::{User, UserCreate, UserPatch};
use crate::error::ShopError;

impl Entity for User {
    type Id = i64;
    type CreatePayload = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &i64 {
        &self.id
    }

    fn from_create(id: i64, params: UserCreate) -> Result<Self, ShopError> {
        Ok(Self {
            id,
            first_name: params.first_name,
            username: params.username,
            created_at: params.created_at,
        })
    }

    /// Refreshes display fields; `created_at` is kept.
    fn on_update(&mut self, patch: UserPatch) -> Result<(), ShopError> {
        self.first_name = patch.first_name;
        self.username = patch.username;
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), ShopError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    users: Table<User>,
}

impl Directory {
    pub fn get(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn list(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    /// Inserts the user on first contact, refreshes name and handle afterwards.
    pub fn register(
        &mut self,
        id: i64,
        first_name: &str,
        username: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User, ShopError> {
        let first_name = first_name.trim().to_string();
        let username = username.map(str::trim).filter(|u| !u.is_empty()).map(str::to_string);

        if self.users.contains(&id) {
            let user = self.users.update(&id, UserPatch { first_name, username })?;
            debug!(user_id = id, "User refreshed");
            return Ok(user.clone());
        }

        let user = self.users.create(
            id,
            UserCreate {
                first_name,
                username,
                created_at: now,
            },
        )?;
        info!(user_id = id, "User registered");
        Ok(user.clone())
    }
}
