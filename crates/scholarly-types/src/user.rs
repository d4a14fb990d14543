//! Portal users.

use serde::{Deserialize, Serialize};

use crate::{Id, Role};

/// A registered identity as known to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Raw role string. May be missing or blank on older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            photo: None,
            role: None,
        }
    }

    /// Effective role, treating missing or unknown values as student.
    pub fn role(&self) -> Role {
        Role::from_remote(self.role.as_deref()).unwrap_or_default()
    }
}
