//! Who is acting.

use serde::{Deserialize, Serialize};

use scholarly_types::Role;

use crate::error::{Result, RuleViolation};

/// The signed-in person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            photo: None,
        }
    }

    pub fn owns(&self, owner_email: &str) -> bool {
        self.email.eq_ignore_ascii_case(owner_email)
    }
}

/// An identity together with its resolved role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub identity: Identity,
    pub role: Role,
}

impl Actor {
    pub fn new(identity: Identity, role: Role) -> Self {
        Self { identity, role }
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }

    /// Fail unless the actor holds at least `required`.
    pub fn require(&self, required: Role) -> Result<()> {
        if self.role >= required {
            Ok(())
        } else {
            Err(RuleViolation::InsufficientRole {
                required,
                actual: self.role,
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainError;

    #[test]
    fn test_require_respects_ordering() {
        let moderator = Actor::new(Identity::new("m@x.io", "Mo"), Role::Moderator);
        assert!(moderator.require(Role::Student).is_ok());
        assert!(moderator.require(Role::Moderator).is_ok());
        assert!(matches!(
            moderator.require(Role::Admin),
            Err(DomainError::Rule(RuleViolation::InsufficientRole { .. }))
        ));
    }

    #[test]
    fn test_owns_ignores_case() {
        let me = Identity::new("Ada@Example.com", "Ada");
        assert!(me.owns("ada@example.com"));
        assert!(!me.owns("bob@example.com"));
    }
}
