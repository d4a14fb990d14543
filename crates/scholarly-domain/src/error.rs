//! Domain error types.

use chrono::NaiveDate;
use thiserror::Error;

use scholarly_types::{ApplicationStatus, Role};

/// Message shown for failures the user cannot act on.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Message shown after a forced logout.
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Domain-level errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Required form fields were left blank. Nothing was sent.
    #[error("Please fill in: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    /// A supplied value is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A business rule forbids the action.
    #[error(transparent)]
    Rule(#[from] RuleViolation),

    /// The status table forbids this move.
    #[error("Cannot move an application from {from} to {to}")]
    IllegalTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    /// A referenced record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend call failed.
    #[error("Backend error: {0}")]
    Client(#[from] scholarly_client::Error),

    /// The owning view went away before the work finished.
    #[error("Cancelled")]
    Cancelled,
}

impl DomainError {
    /// Whether the backend rejected the session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, DomainError::Client(e) if e.is_auth_error())
    }

    /// Text suitable for a one-line notice.
    ///
    /// Backend failures are collapsed to a generic message except for
    /// rejected sessions.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::Client(e) if e.is_auth_error() => SESSION_EXPIRED.to_string(),
            DomainError::Client(e) if e.is_not_found() => "That record no longer exists.".to_string(),
            DomainError::Client(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Business rules checked before contacting the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("You have already applied to this scholarship")]
    AlreadyApplied,

    #[error("The application deadline ({0}) has passed")]
    DeadlinePassed(NaiveDate),

    #[error("Only pending applications can be changed (this one is {0})")]
    NotPending(ApplicationStatus),

    #[error("Reviews can only be added to completed applications (this one is {0})")]
    NotCompleted(ApplicationStatus),

    #[error("You have already reviewed this application")]
    AlreadyReviewed,

    #[error("This application has already been paid")]
    AlreadyPaid,

    #[error("This application belongs to someone else")]
    NotOwner,

    #[error("You cannot change your own account here")]
    SelfModification,

    #[error("Deletion must be confirmed")]
    NotConfirmed,

    #[error("This action requires the {required} role (you are {actual})")]
    InsufficientRole { required: Role, actual: Role },
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
