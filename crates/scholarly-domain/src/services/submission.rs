//! Application submission.
//!
//! A submission merges the applicant's form with a snapshot of the
//! scholarship, stores it as `pending`/`unpaid`, and then either settles
//! it immediately (nothing to pay) or hands off to the payment page.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use scholarly_client::{PaymentPatch, ScholarlyClient};
use scholarly_types::{
    ApplicantDetails, ApplicationStatus, Id, NewApplication, PaymentStatus, Scholarship,
    ScholarshipSnapshot,
};

use crate::cache::{QueryCache, keys};
use crate::error::{DomainError, Result, RuleViolation};
use crate::identity::Identity;
use crate::routes::Route;
use crate::services::fetch;

/// Check that every required applicant field is filled in.
///
/// Only presence is checked; formats are left to the backend.
pub fn validate_details(details: &ApplicantDetails) -> Result<()> {
    let required: [(&'static str, &str); 8] = [
        ("phone", &details.phone),
        ("village", &details.village),
        ("district", &details.district),
        ("country", &details.country),
        ("gender", &details.gender),
        ("applying degree", &details.applying_degree),
        ("SSC result", &details.ssc_result),
        ("HSC result", &details.hsc_result),
    ];
    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation { missing })
    }
}

/// Build the document to create for `applicant` applying to `scholarship`.
pub fn build_application(
    applicant: &Identity,
    scholarship: &Scholarship,
    details: ApplicantDetails,
) -> NewApplication {
    NewApplication {
        scholarship_id: scholarship.id.clone(),
        user_id: None,
        user_email: applicant.email.clone(),
        user_name: applicant.name.clone(),
        applicant: details,
        snapshot: ScholarshipSnapshot::of(scholarship),
        application_status: ApplicationStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        application_date: scholarly_types::now(),
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub application_id: Id,
    pub payment_status: PaymentStatus,
    /// Next stop: the tracking table when nothing is owed, otherwise the
    /// payment page for the new application.
    #[serde(serialize_with = "serialize_route")]
    pub route: Route,
}

fn serialize_route<S: serde::Serializer>(route: &Route, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&route.path())
}

/// Student-side application submission.
pub struct SubmissionService {
    client: ScholarlyClient,
    cache: Arc<QueryCache>,
}

impl SubmissionService {
    pub(crate) fn new(client: ScholarlyClient, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    /// Submit an application for `scholarship`.
    ///
    /// Validation runs before any network call. A scholarship whose
    /// application fee plus service charge is zero is marked paid straight
    /// away and never reaches the payment page.
    #[instrument(skip(self, details), fields(applicant = %applicant.email, scholarship = %scholarship.id))]
    pub async fn submit(
        &self,
        applicant: &Identity,
        scholarship: &Scholarship,
        details: ApplicantDetails,
    ) -> Result<SubmissionOutcome> {
        validate_details(&details)?;

        let today = chrono::Utc::now().date_naive();
        if scholarship.deadline_passed(today)
            && let Some(deadline) = scholarship.application_deadline
        {
            return Err(RuleViolation::DeadlinePassed(deadline).into());
        }

        let existing = fetch::applications_of(&self.client, &self.cache, &applicant.email).await?;
        if existing.iter().any(|a| a.scholarship_id == scholarship.id) {
            return Err(RuleViolation::AlreadyApplied.into());
        }

        let application = build_application(applicant, scholarship, details);
        let inserted = self.client.applications().create(&application).await?;
        self.cache.invalidate(keys::APPLICATIONS);
        let id = inserted.inserted_id;

        if application.snapshot.total_fee().is_zero() {
            self.client
                .applications()
                .set_payment(&id, &PaymentPatch::paid(None))
                .await?;
            info!(application = %id, "submitted, no fees due");
            return Ok(SubmissionOutcome {
                application_id: id,
                payment_status: PaymentStatus::Paid,
                route: Route::MyApplications,
            });
        }

        info!(application = %id, total = %application.snapshot.total_fee(), "submitted, awaiting payment");
        Ok(SubmissionOutcome {
            route: Route::PaymentPage(id.clone()),
            application_id: id,
            payment_status: PaymentStatus::Unpaid,
        })
    }
}
