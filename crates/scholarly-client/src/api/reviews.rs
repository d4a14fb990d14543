//! Reviews API.

use scholarly_types::{NewReview, Review, ReviewPatch};

use crate::client::ScholarlyClient;
use crate::error::Result;
use crate::types::{InsertResponse, ListReviewsQuery, MutationAck};

/// Reviews API client.
pub struct ReviewsApi {
    client: ScholarlyClient,
}

impl ReviewsApi {
    pub(crate) fn new(client: ScholarlyClient) -> Self {
        Self { client }
    }

    /// List all reviews.
    pub async fn list(&self) -> Result<Vec<Review>> {
        self.client.get(&["reviews"]).await
    }

    /// List reviews written by one reviewer.
    pub async fn list_by(&self, email: &str) -> Result<Vec<Review>> {
        let query = ListReviewsQuery {
            email: Some(email.to_string()),
        };
        self.client.get_with_query(&["reviews"], &query).await
    }

    /// List reviews of a scholarship.
    pub async fn for_scholarship(&self, scholarship_id: &str) -> Result<Vec<Review>> {
        self.client.get(&["reviews", "scholarship", scholarship_id]).await
    }

    /// Post a review.
    pub async fn create(&self, review: &NewReview) -> Result<InsertResponse> {
        self.client.post(&["reviews"], review).await
    }

    /// Edit a review.
    pub async fn update(&self, id: &str, patch: &ReviewPatch) -> Result<MutationAck> {
        self.client.patch(&["reviews", id], patch).await
    }

    /// Delete a review.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&["reviews", id]).await
    }
}
