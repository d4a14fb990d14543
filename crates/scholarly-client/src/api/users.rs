//! Users API.

use scholarly_types::{Role, User};

use crate::client::ScholarlyClient;
use crate::error::Result;
use crate::types::{InsertResponse, MutationAck, RolePatch, RoleResponse};

/// Users API client.
pub struct UsersApi {
    client: ScholarlyClient,
}

impl UsersApi {
    pub(crate) fn new(client: ScholarlyClient) -> Self {
        Self { client }
    }

    /// List every registered user.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.client.get(&["users"]).await
    }

    /// Get a user by email.
    pub async fn get(&self, email: &str) -> Result<User> {
        self.client.get(&["users", email]).await
    }

    /// Look up the raw role string for an identity.
    pub async fn role(&self, email: &str) -> Result<RoleResponse> {
        self.client.get(&["users", "role", email]).await
    }

    /// Register a user. The backend ignores duplicates by email.
    pub async fn create(&self, user: &User) -> Result<InsertResponse> {
        self.client.post(&["users"], user).await
    }

    /// Change a user's role.
    pub async fn set_role(&self, id: &str, role: Role) -> Result<MutationAck> {
        self.client.patch(&["users", id, "role"], &RolePatch { role }).await
    }

    /// Remove a user.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&["users", id]).await
    }
}
