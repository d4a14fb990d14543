//! Applications API.

use scholarly_types::{ApplicantDetailsPatch, Application, ApplicationStatus, NewApplication};

use crate::client::ScholarlyClient;
use crate::error::Result;
use crate::types::{
    FeedbackPatch, InsertResponse, ListApplicationsQuery, MutationAck, PaymentPatch,
    ReviewedPatch, StatusPatch,
};

/// Applications API client.
pub struct ApplicationsApi {
    client: ScholarlyClient,
}

impl ApplicationsApi {
    pub(crate) fn new(client: ScholarlyClient) -> Self {
        Self { client }
    }

    /// List every application (moderator view).
    pub async fn list(&self) -> Result<Vec<Application>> {
        self.client.get(&["applications"]).await
    }

    /// List one applicant's applications.
    pub async fn list_for(&self, email: &str) -> Result<Vec<Application>> {
        let query = ListApplicationsQuery {
            email: Some(email.to_string()),
        };
        self.client.get_with_query(&["applications"], &query).await
    }

    /// Get an application by ID.
    pub async fn get(&self, id: &str) -> Result<Application> {
        self.client.get(&["applications", id]).await
    }

    /// Submit an application.
    pub async fn create(&self, application: &NewApplication) -> Result<InsertResponse> {
        self.client.post(&["applications"], application).await
    }

    /// Edit the applicant's personal and education details.
    pub async fn update_details(
        &self,
        id: &str,
        patch: &ApplicantDetailsPatch,
    ) -> Result<MutationAck> {
        self.client.patch(&["applications", id], patch).await
    }

    /// Set the moderation status.
    pub async fn set_status(&self, id: &str, status: ApplicationStatus) -> Result<MutationAck> {
        let body = StatusPatch {
            application_status: status,
        };
        self.client.patch(&["applications", id, "status"], &body).await
    }

    /// Set moderator feedback.
    pub async fn set_feedback(&self, id: &str, feedback: &str) -> Result<MutationAck> {
        let body = FeedbackPatch {
            feedback: feedback.to_string(),
        };
        self.client.patch(&["applications", id, "feedback"], &body).await
    }

    /// Record a payment outcome.
    pub async fn set_payment(&self, id: &str, patch: &PaymentPatch) -> Result<MutationAck> {
        self.client.patch(&["applications", id, "payment"], patch).await
    }

    /// Flag the application as reviewed.
    pub async fn mark_reviewed(&self, id: &str) -> Result<MutationAck> {
        self.client
            .patch(
                &["applications", id, "reviewed"],
                &ReviewedPatch { reviewed: true },
            )
            .await
    }

    /// Delete an application.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&["applications", id]).await
    }
}
