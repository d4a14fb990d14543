//! Student application tracking.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use scholarly_client::ScholarlyClient;
use scholarly_types::{
    ApplicantDetailsPatch, Application, Id, NewReview, Review, ReviewPatch, Scholarship,
    is_valid_rating,
    review::{MAX_RATING, MIN_RATING},
};

use crate::cache::{QueryCache, keys};
use crate::error::{DomainError, Result, RuleViolation};
use crate::identity::Identity;
use crate::lifecycle::{RowActions, ensure_owner, ensure_pending, ensure_reviewable};
use crate::services::fetch;

/// One line of the tracking table.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingRow {
    pub application: Application,
    /// `None` when the scholarship has since been removed.
    pub scholarship: Option<Scholarship>,
    pub actions: RowActions,
}

/// Attach each application's scholarship and row actions.
pub fn join(applications: Vec<Application>, scholarships: &[Scholarship]) -> Vec<TrackingRow> {
    let index: HashMap<&str, &Scholarship> =
        scholarships.iter().map(|s| (s.id.as_str(), s)).collect();

    applications
        .into_iter()
        .map(|application| TrackingRow {
            scholarship: index
                .get(application.scholarship_id.as_str())
                .map(|s| (*s).clone()),
            actions: RowActions::for_application(&application),
            application,
        })
        .collect()
}

/// The signed-in student's view of their own applications.
pub struct TrackingService {
    client: ScholarlyClient,
    cache: Arc<QueryCache>,
}

impl TrackingService {
    pub(crate) fn new(client: ScholarlyClient, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub async fn rows(&self, identity: &Identity) -> Result<Vec<TrackingRow>> {
        let (applications, scholarships) = tokio::try_join!(
            fetch::applications_of(&self.client, &self.cache, &identity.email),
            fetch::scholarships(&self.client, &self.cache),
        )?;
        debug!(count = applications.len(), "tracking rows");
        Ok(join(applications, &scholarships))
    }

    async fn owned(&self, identity: &Identity, id: &str) -> Result<Application> {
        let application = self.client.applications().get(id).await?;
        ensure_owner(identity, &application)?;
        Ok(application)
    }

    /// Edit personal and education details of a pending application.
    #[instrument(skip(self, identity, patch), fields(student = %identity.email))]
    pub async fn edit(
        &self,
        identity: &Identity,
        id: &str,
        patch: &ApplicantDetailsPatch,
    ) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let application = self.owned(identity, id).await?;
        ensure_pending(&application)?;

        self.client.applications().update_details(id, patch).await?;
        self.cache.invalidate(keys::APPLICATIONS);
        info!("application details updated");
        Ok(())
    }

    /// Withdraw a pending application.
    #[instrument(skip(self, identity), fields(student = %identity.email))]
    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<()> {
        let application = self.owned(identity, id).await?;
        ensure_pending(&application)?;

        self.client.applications().delete(id).await?;
        self.cache.invalidate(keys::APPLICATIONS);
        info!("application withdrawn");
        Ok(())
    }

    /// Review a completed application. Returns the new review id.
    #[instrument(skip(self, identity, comment), fields(student = %identity.email))]
    pub async fn add_review(
        &self,
        identity: &Identity,
        id: &str,
        rating: u8,
        comment: &str,
    ) -> Result<Id> {
        if !is_valid_rating(rating) {
            return Err(DomainError::InvalidInput(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        let application = self.owned(identity, id).await?;
        ensure_reviewable(&application)?;

        // The flag is set after the review is posted, so it can lag behind
        // a review that already exists.
        let prior = self.client.reviews().list_by(&identity.email).await?;
        if prior.iter().any(|r| r.application_id.as_deref() == Some(id)) {
            if let Err(e) = self.client.applications().mark_reviewed(id).await {
                warn!(error = %e, "could not flag reviewed application");
            }
            self.cache.invalidate(keys::APPLICATIONS);
            return Err(RuleViolation::AlreadyReviewed.into());
        }

        let review = NewReview {
            scholarship_id: application.scholarship_id.clone(),
            application_id: application.id.clone(),
            scholarship_name: application.snapshot.scholarship_name.clone(),
            university_name: application.snapshot.university_name.clone(),
            reviewer_name: identity.name.clone(),
            reviewer_email: identity.email.clone(),
            reviewer_image: identity.photo.clone(),
            rating,
            comment: comment.trim().to_string(),
            review_date: scholarly_types::now(),
        };
        let inserted = self.client.reviews().create(&review).await?;
        self.cache.invalidate(keys::REVIEWS);

        let marked = self.client.applications().mark_reviewed(id).await;
        self.cache.invalidate(keys::APPLICATIONS);
        marked?;

        info!(review = %inserted.inserted_id, rating, "review posted");
        Ok(inserted.inserted_id)
    }

    /// Reviews written by `identity`, newest first.
    pub async fn my_reviews(&self, identity: &Identity) -> Result<Vec<Review>> {
        let mut reviews = self.client.reviews().list_by(&identity.email).await?;
        reviews.sort_by(|a, b| b.review_date.cmp(&a.review_date));
        Ok(reviews)
    }

    /// The identity's own review with `id`. Other people's reviews are
    /// reported as missing.
    async fn own_review(&self, identity: &Identity, id: &str) -> Result<Review> {
        self.client
            .reviews()
            .list_by(&identity.email)
            .await?
            .into_iter()
            .find(|r| r.id == id && identity.owns(&r.reviewer_email))
            .ok_or_else(|| DomainError::NotFound(format!("review {}", id)))
    }

    #[instrument(skip(self, identity, patch), fields(student = %identity.email))]
    pub async fn edit_review(
        &self,
        identity: &Identity,
        id: &str,
        patch: &ReviewPatch,
    ) -> Result<()> {
        if let Some(rating) = patch.rating
            && !is_valid_rating(rating)
        {
            return Err(DomainError::InvalidInput(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        if patch.rating.is_none() && patch.comment.is_none() {
            return Ok(());
        }
        self.own_review(identity, id).await?;

        self.client.reviews().update(id, patch).await?;
        self.cache.invalidate(keys::REVIEWS);
        info!("review updated");
        Ok(())
    }

    #[instrument(skip(self, identity), fields(student = %identity.email))]
    pub async fn delete_review(&self, identity: &Identity, id: &str) -> Result<()> {
        self.own_review(identity, id).await?;

        self.client.reviews().delete(id).await?;
        self.cache.invalidate(keys::REVIEWS);
        info!("review deleted");
        Ok(())
    }
}
