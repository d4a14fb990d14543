//! Scholarships API.

use scholarly_types::{NewScholarship, Scholarship, ScholarshipPatch};

use crate::client::ScholarlyClient;
use crate::error::Result;
use crate::types::{InsertResponse, MutationAck};

/// Scholarships API client.
pub struct ScholarshipsApi {
    client: ScholarlyClient,
}

impl ScholarshipsApi {
    pub(crate) fn new(client: ScholarlyClient) -> Self {
        Self { client }
    }

    /// List all scholarships.
    pub async fn list(&self) -> Result<Vec<Scholarship>> {
        self.client.get(&["scholarships"]).await
    }

    /// Get a scholarship by ID.
    pub async fn get(&self, id: &str) -> Result<Scholarship> {
        self.client.get(&["scholarships", id]).await
    }

    /// Publish a scholarship.
    pub async fn create(&self, scholarship: &NewScholarship) -> Result<InsertResponse> {
        self.client.post(&["scholarships"], scholarship).await
    }

    /// Update a scholarship.
    pub async fn update(&self, id: &str, patch: &ScholarshipPatch) -> Result<MutationAck> {
        self.client.patch(&["scholarships", id], patch).await
    }

    /// Delete a scholarship.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&["scholarships", id]).await
    }
}
