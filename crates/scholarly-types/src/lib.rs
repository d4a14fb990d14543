//! Shared types for the Scholarly portal.
//!
//! These mirror the documents served by the portal backend. Field names
//! follow the backend's camelCase JSON and Mongo-style `_id` keys.

pub mod application;
pub mod error;
pub mod review;
pub mod role;
pub mod scholarship;
pub mod status;
pub mod user;

pub use application::{
    ApplicantDetails, ApplicantDetailsPatch, Application, NewApplication, ScholarshipSnapshot,
};
pub use error::ParseError;
pub use review::{NewReview, Review, ReviewPatch, average_rating, is_valid_rating};
pub use role::Role;
pub use scholarship::{NewScholarship, Scholarship, ScholarshipPatch};
pub use status::{ApplicationStatus, PaymentStatus};
pub use user::User;

pub use rust_decimal::Decimal;

/// Identifier assigned by the backend.
pub type Id = String;

/// UTC timestamp used on every document.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current UTC time.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}
