//! Configuration system for the Scholarly portal client.
//!
//! Provides TOML-based configuration with:
//! - Backend connection settings (`[server]`)
//! - Payment return URLs and currency (`[checkout]`)
//! - Query cache and catalog paging knobs (`[cache]`, `[catalog]`)
//! - Config file layering (user config dir + project-local overrides)
//!
//! Login credentials are kept apart from configuration in
//! `credentials.json` inside the user config directory.

pub mod credentials;
pub mod discovery;
pub mod error;
pub mod types;

pub use credentials::{
    Credentials, clear_credentials, credentials_path, load_credentials, save_credentials,
};
pub use discovery::{
    ConfigSource, LayerKind, LoadedConfig, load_config, load_config_file, load_config_with_options,
    save_config, user_config_dir, user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
