//! Application lifecycle rules.
//!
//! Every view that mutates an application goes through these checks, so
//! the rules live in one place instead of being repeated per screen.

use serde::Serialize;

use scholarly_types::{Application, ApplicationStatus};

use crate::error::{DomainError, Result, RuleViolation};
use crate::identity::Identity;

/// Controls offered on a student's application row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowActions {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_review: bool,
}

impl RowActions {
    pub fn for_application(application: &Application) -> Self {
        let pending = application.is_pending();
        Self {
            can_edit: pending,
            can_delete: pending,
            can_review: is_reviewable(application),
        }
    }
}

/// Completed and not yet reviewed.
pub fn is_reviewable(application: &Application) -> bool {
    application.application_status == ApplicationStatus::Completed && !application.reviewed
}

/// Check a moderator status change against the transition table.
pub fn ensure_transition(from: ApplicationStatus, to: ApplicationStatus) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(DomainError::IllegalTransition { from, to })
    }
}

/// Students may only edit or delete while the application is pending.
pub fn ensure_pending(application: &Application) -> Result<()> {
    if application.is_pending() {
        Ok(())
    } else {
        Err(RuleViolation::NotPending(application.application_status).into())
    }
}

/// One review per application, and only once it is completed.
pub fn ensure_reviewable(application: &Application) -> Result<()> {
    if application.application_status != ApplicationStatus::Completed {
        return Err(RuleViolation::NotCompleted(application.application_status).into());
    }
    if application.reviewed {
        return Err(RuleViolation::AlreadyReviewed.into());
    }
    Ok(())
}

pub fn ensure_owner(identity: &Identity, application: &Application) -> Result<()> {
    if identity.owns(&application.user_email) {
        Ok(())
    } else {
        Err(RuleViolation::NotOwner.into())
    }
}
