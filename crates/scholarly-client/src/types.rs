//! Request and response bodies for the portal backend.
//!
//! Documents themselves live in `scholarly-types`; these are the
//! envelopes and partial updates wrapped around them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use scholarly_types::{ApplicationStatus, Id, PaymentStatus, Role, Timestamp};

// ─────────────────────────────────────────────────────────────────────────────
// Write acknowledgements
// ─────────────────────────────────────────────────────────────────────────────

/// Response to a create call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    #[serde(default)]
    pub acknowledged: bool,
    pub inserted_id: Id,
}

/// Response to an update call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationAck {
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub matched_count: u64,
    #[serde(default)]
    pub modified_count: u64,
}

impl MutationAck {
    /// Whether the update found its target document.
    pub fn matched(&self) -> bool {
        self.matched_count > 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// Role lookup response. The role may be absent or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResponse {
    #[serde(default)]
    pub role: Option<String>,
}

/// Request to change a user's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePatch {
    pub role: Role,
}

// ─────────────────────────────────────────────────────────────────────────────
// Applications
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for listing applications.
#[derive(Debug, Default, Serialize)]
pub struct ListApplicationsQuery {
    /// Restrict to one applicant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Request to move an application to a new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    pub application_status: ApplicationStatus,
}

/// Request to set moderator feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPatch {
    pub feedback: String,
}

/// Request to record a payment outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPatch {
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl PaymentPatch {
    /// Mark as paid now, optionally recording the processor's reference.
    pub fn paid(transaction_id: Option<String>) -> Self {
        Self {
            payment_status: PaymentStatus::Paid,
            paid_at: Some(scholarly_types::now()),
            transaction_id,
        }
    }
}

/// Request to flag an application as reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewedPatch {
    pub reviewed: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Reviews
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for listing reviews.
#[derive(Debug, Default, Serialize)]
pub struct ListReviewsQuery {
    /// Restrict to one reviewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

/// Request to open a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub application_id: Id,
    pub applicant_name: String,
    pub applicant_email: String,
    pub scholarship_name: String,
    pub university_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    #[serde(default)]
    pub id: Option<String>,
    /// Hosted checkout page to send the browser to.
    pub url: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the server-side status aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(rename = "_id")]
    pub status: ApplicationStatus,
    pub count: u64,
}
