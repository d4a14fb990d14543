//! Student reviews of scholarships.

use serde::{Deserialize, Serialize};

use crate::{Id, Timestamp};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// A review left after a completed application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: Id,
    pub scholarship_id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Id>,
    #[serde(default)]
    pub scholarship_name: String,
    #[serde(default)]
    pub university_name: String,
    #[serde(default)]
    pub reviewer_name: String,
    pub reviewer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_image: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub review_date: Timestamp,
}

/// Body posted to create a review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub scholarship_id: Id,
    pub application_id: Id,
    pub scholarship_name: String,
    pub university_name: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_image: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub review_date: Timestamp,
}

/// Edit of an existing review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Whether `rating` is within the accepted range.
pub fn is_valid_rating(rating: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Mean rating across `reviews`, or `None` when there are none.
pub fn average_rating<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Option<f64> {
    let (sum, count) = reviews
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), r| (sum + r.rating as u64, count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}
