//! Moderator review table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use scholarly_client::ScholarlyClient;
use scholarly_types::{Application, ApplicationStatus, Role};

use crate::cache::{QueryCache, keys};
use crate::error::{DomainError, Result, RuleViolation};
use crate::identity::Actor;
use crate::lifecycle::ensure_transition;
use crate::services::fetch;

/// Shown when the filtered table is empty.
pub const NO_APPLICATIONS_MESSAGE: &str = "No applications found";

/// Client-side filter over the full application set.
///
/// `search` matches applicant name, email or university, ignoring case.
/// `status` and `category` are exact and independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        if let Some(status) = self.status
            && application.application_status != status
        {
            return false;
        }
        if let Some(category) = self.category.as_deref()
            && application.snapshot.scholarship_category != category
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [
                    &application.user_name,
                    &application.user_email,
                    &application.snapshot.university_name,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }

    pub fn apply(&self, applications: Vec<Application>) -> Vec<Application> {
        applications.into_iter().filter(|a| self.matches(a)).collect()
    }
}

/// Moderator operations over every application.
pub struct ModerationService {
    client: ScholarlyClient,
    cache: Arc<QueryCache>,
}

impl ModerationService {
    pub(crate) fn new(client: ScholarlyClient, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<Application>> {
        actor.require(Role::Moderator)?;
        fetch::applications(&self.client, &self.cache).await
    }

    pub async fn filtered(
        &self,
        actor: &Actor,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>> {
        Ok(filter.apply(self.list(actor).await?))
    }

    /// Move an application to `status`.
    ///
    /// The transition table is checked against the current server copy
    /// before anything is written. A failed write is not rolled back
    /// locally; the cache is dropped so the next read refetches.
    #[instrument(skip(self, actor), fields(moderator = %actor.email()))]
    pub async fn set_status(
        &self,
        actor: &Actor,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<()> {
        actor.require(Role::Moderator)?;
        let current = self.client.applications().get(id).await?;
        ensure_transition(current.application_status, status)?;
        if current.application_status == status {
            return Ok(());
        }

        let result = self.client.applications().set_status(id, status).await;
        self.cache.invalidate(keys::APPLICATIONS);
        result?;
        info!(from = %current.application_status, to = %status, "status changed");
        Ok(())
    }

    pub async fn set_feedback(&self, actor: &Actor, id: &str, feedback: &str) -> Result<()> {
        actor.require(Role::Moderator)?;
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(DomainError::Validation {
                missing: vec!["feedback"],
            });
        }
        self.client.applications().set_feedback(id, feedback).await?;
        self.cache.invalidate(keys::APPLICATIONS);
        Ok(())
    }

    /// Delete an application. `confirmed` must be set by the caller after
    /// asking the moderator.
    pub async fn delete(&self, actor: &Actor, id: &str, confirmed: bool) -> Result<()> {
        actor.require(Role::Moderator)?;
        if !confirmed {
            return Err(RuleViolation::NotConfirmed.into());
        }
        self.client.applications().delete(id).await?;
        self.cache.invalidate(keys::APPLICATIONS);
        info!(application = id, moderator = %actor.email(), "application deleted");
        Ok(())
    }
}
