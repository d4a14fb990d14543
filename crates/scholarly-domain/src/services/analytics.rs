//! Admin analytics.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use scholarly_client::{ScholarlyClient, StatusCount};
use scholarly_types::{Application, ApplicationStatus, Review, Role, Scholarship, average_rating};

use crate::cache::QueryCache;
use crate::error::Result;
use crate::identity::Actor;
use crate::services::fetch;

/// Portal-wide figures computed from the fetched lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalSummary {
    pub total_applications: usize,
    pub total_scholarships: usize,
    pub total_reviews: usize,
    /// Every status appears, with zero when unused.
    pub by_status: BTreeMap<ApplicationStatus, usize>,
    pub paid: usize,
    pub unpaid: usize,
    /// Application fee plus service charge over paid applications.
    pub collected_fees: Decimal,
    pub by_category: BTreeMap<String, usize>,
    pub average_rating: Option<f64>,
}

pub fn summarize(
    applications: &[Application],
    scholarships: &[Scholarship],
    reviews: &[Review],
) -> PortalSummary {
    let mut by_status: BTreeMap<ApplicationStatus, usize> =
        ApplicationStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_category = BTreeMap::new();
    let mut paid = 0;
    let mut collected_fees = Decimal::ZERO;

    for application in applications {
        *by_status.entry(application.application_status).or_default() += 1;
        *by_category
            .entry(application.snapshot.scholarship_category.clone())
            .or_default() += 1;
        if application.payment_status.is_paid() {
            paid += 1;
            collected_fees += application.total_fee();
        }
    }

    PortalSummary {
        total_applications: applications.len(),
        total_scholarships: scholarships.len(),
        total_reviews: reviews.len(),
        by_status,
        paid,
        unpaid: applications.len() - paid,
        collected_fees,
        by_category,
        average_rating: average_rating(reviews),
    }
}

pub struct AnalyticsService {
    client: ScholarlyClient,
    cache: Arc<QueryCache>,
}

impl AnalyticsService {
    pub(crate) fn new(client: ScholarlyClient, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub async fn summary(&self, actor: &Actor) -> Result<PortalSummary> {
        actor.require(Role::Admin)?;
        let (applications, scholarships, reviews) = tokio::try_join!(
            fetch::applications(&self.client, &self.cache),
            fetch::scholarships(&self.client, &self.cache),
            fetch::reviews(&self.client, &self.cache),
        )?;
        Ok(summarize(&applications, &scholarships, &reviews))
    }

    /// Status counts as aggregated by the backend.
    pub async fn server_status_counts(&self, actor: &Actor) -> Result<Vec<StatusCount>> {
        actor.require(Role::Admin)?;
        Ok(self.client.dashboard().status_counts().await?)
    }
}
