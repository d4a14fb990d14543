//! Persisted login credentials.
//!
//! The identity provider issues an ID token out of band; the CLI stores it
//! alongside the account email in `credentials.json` so each request can
//! attach it as a bearer credential. A forced logout deletes the file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

const CREDENTIALS_FILE: &str = "credentials.json";

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
            name: None,
            photo: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Location of the credentials file within `config_dir`.
pub fn credentials_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CREDENTIALS_FILE)
}

/// Read stored credentials, if any.
pub fn load_credentials(config_dir: &Path) -> Result<Option<Credentials>> {
    let path = credentials_path(config_dir);
    if !path.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Store credentials, replacing any previous login.
pub fn save_credentials(config_dir: &Path, credentials: &Credentials) -> Result<()> {
    std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteFile {
        path: config_dir.display().to_string(),
        source: e,
    })?;

    let path = credentials_path(config_dir);
    let contents = serde_json::to_string_pretty(credentials)?;
    let write_err = |source| ConfigError::WriteFile {
        path: path.display().to_string(),
        source,
    };

    let mut file = private_file(&path).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    Ok(())
}

/// Open `path` for writing with owner-only access before any content is
/// written. An existing file is narrowed to 0600 first.
#[cfg(unix)]
fn private_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn private_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Remove stored credentials. Returns whether a file was removed.
pub fn clear_credentials(config_dir: &Path) -> Result<bool> {
    let path = credentials_path(config_dir);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(ConfigError::WriteFile {
            path: path.display().to_string(),
            source: e,
        }),
    }
}
