//! Scholarship applications.
//!
//! An application carries two groups of copied fields:
//!
//! - [`ApplicantDetails`]: personal and education information the student
//!   typed in. This is the only part a student may later edit.
//! - [`ScholarshipSnapshot`]: identity and fee fields copied from the
//!   scholarship at submission time, so editing the listing later never
//!   rewrites history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ApplicationStatus, Id, PaymentStatus, Scholarship, Timestamp};

/// Personal and education fields entered by the applicant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetails {
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub village: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub applying_degree: String,
    #[serde(default)]
    pub ssc_result: String,
    #[serde(default)]
    pub hsc_result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_gap: Option<String>,
}

/// Edit of applicant details. Financial and identity fields are not
/// representable here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDetailsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applying_degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssc_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsc_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_gap: Option<String>,
}

impl ApplicantDetailsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Scholarship fields frozen into the application when it is submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipSnapshot {
    #[serde(default)]
    pub university_name: String,
    #[serde(default)]
    pub scholarship_name: String,
    #[serde(default)]
    pub scholarship_category: String,
    #[serde(default)]
    pub subject_category: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub application_fees: Decimal,
    #[serde(default)]
    pub service_charge: Decimal,
}

impl ScholarshipSnapshot {
    pub fn of(scholarship: &Scholarship) -> Self {
        Self {
            university_name: scholarship.university_name.clone(),
            scholarship_name: scholarship.scholarship_name.clone(),
            scholarship_category: scholarship.scholarship_category.clone(),
            subject_category: scholarship.subject_category.clone(),
            degree: scholarship.degree.clone(),
            application_fees: scholarship.application_fees,
            service_charge: scholarship.service_charge,
        }
    }

    pub fn total_fee(&self) -> Decimal {
        self.application_fees + self.service_charge
    }
}

/// An application document as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: Id,
    pub scholarship_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Id>,
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(flatten)]
    pub applicant: ApplicantDetails,
    #[serde(flatten)]
    pub snapshot: ScholarshipSnapshot,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default)]
    pub reviewed: bool,
    pub application_date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl Application {
    pub fn total_fee(&self) -> Decimal {
        self.snapshot.total_fee()
    }

    pub fn is_pending(&self) -> bool {
        self.application_status == ApplicationStatus::Pending
    }
}

/// Body posted to create an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub scholarship_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Id>,
    pub user_email: String,
    pub user_name: String,
    #[serde(flatten)]
    pub applicant: ApplicantDetails,
    #[serde(flatten)]
    pub snapshot: ScholarshipSnapshot,
    pub application_status: ApplicationStatus,
    pub payment_status: PaymentStatus,
    pub application_date: Timestamp,
}
