//! Dashboard API.

use crate::client::ScholarlyClient;
use crate::error::Result;
use crate::types::StatusCount;

/// Dashboard API client.
pub struct DashboardApi {
    client: ScholarlyClient,
}

impl DashboardApi {
    pub(crate) fn new(client: ScholarlyClient) -> Self {
        Self { client }
    }

    /// Application counts per status, aggregated by the backend.
    pub async fn status_counts(&self) -> Result<Vec<StatusCount>> {
        self.client.get(&["application", "dashboard", "status"]).await
    }
}
