//! Where config files live and how they stack.
//!
//! Two files are read, user first, then the working directory's
//! `scholarly.toml`; each present section of a later file replaces the
//! earlier one. Command-line flags are applied by the binary on top.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{ConfigError, PortalConfig, Result};

const APP_NAME: &str = "scholarly";
const USER_CONFIG_FILE: &str = "config.toml";
const PROJECT_CONFIG_FILE: &str = "scholarly.toml";

/// Overrides the platform config directory, e.g. for tests or containers.
const CONFIG_DIR_ENV: &str = "SCHOLARLY_CONFIG_DIR";

/// Which layer a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    User,
    Project,
}

/// One candidate config file and what happened when reading it.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub kind: LayerKind,
    pub path: PathBuf,
    pub loaded: bool,
}

/// The merged config plus a record of how it was assembled.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PortalConfig,
    /// Lowest precedence first.
    pub sources: Vec<ConfigSource>,
    /// Files that exist but could not be used.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter_map(|s| s.loaded.then_some(s.path.as_path()))
            .collect()
    }
}

/// Read the user and project layers. `project_dir` defaults to the
/// working directory.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// As [`load_config`], reading the user layer from `config_dir` instead of
/// the environment or platform default.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let user_file = config_dir
        .map(Path::to_path_buf)
        .or_else(user_config_dir)
        .map(|dir| dir.join(USER_CONFIG_FILE));
    let project_file = match project_dir {
        Some(dir) => dir.join(PROJECT_CONFIG_FILE),
        None => PathBuf::from(PROJECT_CONFIG_FILE),
    };

    let candidates = user_file
        .map(|p| (LayerKind::User, p))
        .into_iter()
        .chain(std::iter::once((LayerKind::Project, project_file)));

    let mut loaded = LoadedConfig {
        config: PortalConfig::new(),
        sources: Vec::new(),
        warnings: Vec::new(),
    };
    for (kind, path) in candidates {
        let applied = apply_layer(&mut loaded, &path);
        loaded.sources.push(ConfigSource {
            kind,
            path,
            loaded: applied,
        });
    }
    Ok(loaded)
}

/// Merge `path` into `loaded` if it exists and parses. A file that fails
/// is recorded as a warning rather than aborting the load.
fn apply_layer(loaded: &mut LoadedConfig, path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    match load_config_file(path) {
        Ok(layer) => {
            debug!(path = %path.display(), "config layer applied");
            loaded.config.merge(layer);
            true
        }
        Err(e) => {
            loaded
                .warnings
                .push(format!("Ignoring {}: {}", path.display(), e));
            false
        }
    }
}

/// Parse a single file.
pub fn load_config_file(path: &Path) -> Result<PortalConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    PortalConfig::from_toml(&text)
}

/// Write `config` to `path`, creating missing directories.
pub fn save_config(config: &PortalConfig, path: &Path) -> Result<()> {
    let write_err = |at: &Path, source| ConfigError::WriteFile {
        path: at.display().to_string(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| write_err(dir, e))?;
    }
    std::fs::write(path, config.to_toml()?).map_err(|e| write_err(path, e))
}

pub fn user_config_path() -> Option<PathBuf> {
    user_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// `$SCHOLARLY_CONFIG_DIR` when set and non-empty, else the platform
/// config dir plus `scholarly` (`~/.config/scholarly` on Linux).
pub fn user_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|d| d.join(APP_NAME)),
    }
}
