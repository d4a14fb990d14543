//! User administration.

use std::sync::Arc;

use tracing::{info, instrument};

use scholarly_client::ScholarlyClient;
use scholarly_types::{Role, User};

use crate::cache::{QueryCache, keys};
use crate::error::{DomainError, Result, RuleViolation};
use crate::identity::Actor;
use crate::services::fetch;

/// Admin-only management of registered users.
pub struct UserAdminService {
    client: ScholarlyClient,
    cache: Arc<QueryCache>,
}

impl UserAdminService {
    pub(crate) fn new(client: ScholarlyClient, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    /// All users, or only those holding `role`.
    pub async fn list(&self, actor: &Actor, role: Option<Role>) -> Result<Vec<User>> {
        actor.require(Role::Admin)?;
        let users = fetch::users(&self.client, &self.cache).await?;
        Ok(match role {
            Some(role) => users.into_iter().filter(|u| u.role() == role).collect(),
            None => users,
        })
    }

    async fn target(&self, actor: &Actor, id: &str) -> Result<User> {
        let user = fetch::users(&self.client, &self.cache)
            .await?
            .into_iter()
            .find(|u| u.id.as_deref() == Some(id))
            .ok_or_else(|| DomainError::NotFound(format!("user {}", id)))?;
        if actor.identity.owns(&user.email) {
            return Err(RuleViolation::SelfModification.into());
        }
        Ok(user)
    }

    #[instrument(skip(self, actor), fields(admin = %actor.email()))]
    pub async fn set_role(&self, actor: &Actor, id: &str, role: Role) -> Result<()> {
        actor.require(Role::Admin)?;
        let user = self.target(actor, id).await?;
        if user.role() == role {
            return Ok(());
        }

        self.client.users().set_role(id, role).await?;
        self.cache.invalidate(keys::USERS);
        info!(user = %user.email, from = %user.role(), to = %role, "role changed");
        Ok(())
    }

    #[instrument(skip(self, actor), fields(admin = %actor.email()))]
    pub async fn delete(&self, actor: &Actor, id: &str, confirmed: bool) -> Result<()> {
        actor.require(Role::Admin)?;
        if !confirmed {
            return Err(RuleViolation::NotConfirmed.into());
        }
        let user = self.target(actor, id).await?;

        self.client.users().delete(id).await?;
        self.cache.invalidate(keys::USERS);
        info!(user = %user.email, "user deleted");
        Ok(())
    }
}
