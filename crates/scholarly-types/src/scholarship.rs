//! Scholarship listings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Id, Timestamp};

/// A funding opportunity published on the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    #[serde(rename = "_id")]
    pub id: Id,
    pub scholarship_name: String,
    pub university_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_image: Option<String>,
    #[serde(default)]
    pub university_country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_world_rank: Option<u32>,
    #[serde(default)]
    pub subject_category: String,
    /// Funding tier, e.g. "Full fund".
    #[serde(default)]
    pub scholarship_category: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition_fees: Option<Decimal>,
    #[serde(default)]
    pub application_fees: Decimal,
    #[serde(default)]
    pub service_charge: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Scholarship {
    /// Application fee plus service charge.
    pub fn total_fee(&self) -> Decimal {
        self.application_fees + self.service_charge
    }

    /// Whether applications are closed as of `today`.
    pub fn deadline_passed(&self, today: NaiveDate) -> bool {
        self.application_deadline
            .map(|deadline| today > deadline)
            .unwrap_or(false)
    }
}

/// Body for publishing a new scholarship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScholarship {
    pub scholarship_name: String,
    pub university_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_image: Option<String>,
    pub university_country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_world_rank: Option<u32>,
    pub subject_category: String,
    pub scholarship_category: String,
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition_fees: Option<Decimal>,
    #[serde(default)]
    pub application_fees: Decimal,
    #[serde(default)]
    pub service_charge: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update of a scholarship. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_world_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scholarship_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition_fees: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_fees: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_charge: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ScholarshipPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
