//! Domain services.
//!
//! One service per portal screen. They share a client and a query cache so
//! a mutation in one view invalidates what the others have fetched.

pub mod analytics;
pub mod catalog;
pub mod moderation;
pub mod payment;
pub mod submission;
pub mod tracking;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use scholarly_client::ScholarlyClient;
use tracing::info;

use crate::cache::QueryCache;
use crate::roles::RoleResolver;

pub use payment::CheckoutSettings;

/// Configuration for domain services.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// How long fetched lists stay fresh. Zero disables caching.
    pub cache_ttl: Duration,
    /// Most queries cached at once.
    pub cache_capacity: usize,
    /// Scholarships per catalog page.
    pub page_size: usize,
    /// Where the payment processor sends the browser back to.
    pub checkout: CheckoutSettings,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            cache_capacity: 64,
            page_size: 9,
            checkout: CheckoutSettings::default(),
        }
    }
}

/// Domain services facade.
#[derive(Clone)]
pub struct PortalServices {
    client: ScholarlyClient,
    cache: Arc<QueryCache>,
    settings: ServiceSettings,
}

impl PortalServices {
    pub fn new(client: ScholarlyClient, settings: ServiceSettings) -> Self {
        info!(base_url = %client.base_url(), "initializing portal services");
        Self {
            cache: Arc::new(QueryCache::with_capacity(
                settings.cache_ttl,
                settings.cache_capacity,
            )),
            client,
            settings,
        }
    }

    pub fn client(&self) -> &ScholarlyClient {
        &self.client
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Start resolving the role of `email`.
    pub fn resolve_role(&self, email: impl Into<String>) -> RoleResolver {
        RoleResolver::spawn(self.client.clone(), email)
    }

    pub fn catalog(&self) -> catalog::CatalogService {
        catalog::CatalogService::new(
            self.client.clone(),
            self.cache.clone(),
            self.settings.page_size,
        )
    }

    pub fn submission(&self) -> submission::SubmissionService {
        submission::SubmissionService::new(self.client.clone(), self.cache.clone())
    }

    pub fn payment(&self) -> payment::PaymentService {
        payment::PaymentService::new(
            self.client.clone(),
            self.cache.clone(),
            self.settings.checkout.clone(),
        )
    }

    pub fn tracking(&self) -> tracking::TrackingService {
        tracking::TrackingService::new(self.client.clone(), self.cache.clone())
    }

    pub fn moderation(&self) -> moderation::ModerationService {
        moderation::ModerationService::new(self.client.clone(), self.cache.clone())
    }

    pub fn users(&self) -> users::UserAdminService {
        users::UserAdminService::new(self.client.clone(), self.cache.clone())
    }

    pub fn analytics(&self) -> analytics::AnalyticsService {
        analytics::AnalyticsService::new(self.client.clone(), self.cache.clone())
    }
}

/// Cached fetch helpers shared by the services.
pub(crate) mod fetch {
    use scholarly_client::ScholarlyClient;
    use scholarly_types::{Application, Review, Scholarship, User};

    use crate::cache::{QueryCache, keys};
    use crate::error::Result;

    pub async fn scholarships(
        client: &ScholarlyClient,
        cache: &QueryCache,
    ) -> Result<Vec<Scholarship>> {
        Ok(cache
            .get_or_fetch(keys::SCHOLARSHIPS, || async move {
                client.scholarships().list().await
            })
            .await?)
    }

    pub async fn applications(
        client: &ScholarlyClient,
        cache: &QueryCache,
    ) -> Result<Vec<Application>> {
        Ok(cache
            .get_or_fetch(keys::APPLICATIONS, || async move {
                client.applications().list().await
            })
            .await?)
    }

    pub async fn applications_of(
        client: &ScholarlyClient,
        cache: &QueryCache,
        email: &str,
    ) -> Result<Vec<Application>> {
        Ok(cache
            .get_or_fetch(&keys::applications_of(email), || async move {
                client.applications().list_for(email).await
            })
            .await?)
    }

    pub async fn reviews(client: &ScholarlyClient, cache: &QueryCache) -> Result<Vec<Review>> {
        Ok(cache
            .get_or_fetch(keys::REVIEWS, || async move {
                client.reviews().list().await
            })
            .await?)
    }

    pub async fn users(client: &ScholarlyClient, cache: &QueryCache) -> Result<Vec<User>> {
        Ok(cache
            .get_or_fetch(keys::USERS, || async move {
                client.users().list().await
            })
            .await?)
    }
}
