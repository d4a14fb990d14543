//! Role resolution for the signed-in identity.
//!
//! The lookup runs in the background. Until it settles, and whenever it
//! fails or comes back blank, the identity is treated as a student: the
//! least privileged tier. The backend re-checks authorization on every
//! mutating call, so this value only decides what to offer, never what
//! is allowed.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use scholarly_client::ScholarlyClient;
use scholarly_types::Role;

use crate::error::{DomainError, Result};

/// Progress of a role lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleState {
    Pending,
    /// `None` when the lookup failed or returned nothing usable.
    Resolved(Option<Role>),
    /// The backend refused the credential. The client has already logged
    /// out.
    Rejected { status: u16 },
}

impl RoleState {
    /// Role to act on right now.
    pub fn effective(&self) -> Role {
        match self {
            RoleState::Resolved(Some(role)) => *role,
            _ => Role::Student,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RoleState::Pending)
    }

    /// The effective role, or the session failure for a rejected lookup.
    pub fn confirmed(&self) -> Result<Role> {
        match self {
            RoleState::Rejected { status } => Err(DomainError::Client(
                scholarly_client::Error::Auth {
                    status: *status,
                    message: "role lookup rejected".to_string(),
                },
            )),
            other => Ok(other.effective()),
        }
    }
}

/// Fetch the role once and interpret it.
///
/// Ordinary failures resolve to `None` so callers fall back the same way
/// they do for a blank role. A refused credential is kept apart.
pub async fn lookup_role(client: &ScholarlyClient, email: &str) -> RoleState {
    match client.users().role(email).await {
        Ok(response) => {
            let role = Role::from_remote(response.role.as_deref());
            debug!(email, ?role, "role resolved");
            RoleState::Resolved(role)
        }
        Err(scholarly_client::Error::Auth { status, .. }) => {
            warn!(email, status, "role lookup rejected the session");
            RoleState::Rejected { status }
        }
        Err(e) => {
            warn!(email, error = %e, "role lookup failed");
            RoleState::Resolved(None)
        }
    }
}

/// Background role lookup with a student default while unresolved.
pub struct RoleResolver {
    state: watch::Receiver<RoleState>,
    task: JoinHandle<()>,
}

impl RoleResolver {
    /// Start looking up the role for `email`.
    pub fn spawn(client: ScholarlyClient, email: impl Into<String>) -> Self {
        let email = email.into();
        let (tx, rx) = watch::channel(RoleState::Pending);
        let task = tokio::spawn(async move {
            let state = lookup_role(&client, &email).await;
            // Receivers may all be gone; nothing to report then.
            let _ = tx.send(state);
        });
        Self { state: rx, task }
    }

    pub fn state(&self) -> RoleState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// The role to act on now: the resolved role, or student.
    pub fn final_role(&self) -> Role {
        self.state.borrow().effective()
    }

    /// Wait for the lookup to finish and return the effective role.
    pub async fn settled(&mut self) -> Role {
        self.settled_state().await.effective()
    }

    /// As [`settled`](Self::settled), but a rejected session is an error
    /// rather than a student.
    pub async fn confirmed(&mut self) -> Result<Role> {
        self.settled_state().await.confirmed()
    }

    async fn settled_state(&mut self) -> RoleState {
        match self.state.wait_for(|s| !s.is_pending()).await {
            Ok(state) => state.clone(),
            Err(_) => RoleState::Resolved(None),
        }
    }
}

impl Drop for RoleResolver {
    fn drop(&mut self) {
        self.task.abort();
    }
}
