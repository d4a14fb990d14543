//! Configuration types.
//!
//! Every section is optional in a file; when a later layer defines a
//! section it replaces the earlier one wholesale.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default backend URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default lifetime of cached list queries in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Default number of cached queries kept before the least recent is evicted.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 64;

/// Default number of scholarships per catalog page.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Root configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Backend connection settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerSection>,

    /// Payment processor return URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutSection>,

    /// Query cache settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheSection>,

    /// Catalog browsing settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogSection>,
}

impl PortalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: PortalConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: PortalConfig) {
        if other.server.is_some() {
            self.server = other.server;
        }
        if other.checkout.is_some() {
            self.checkout = other.checkout;
        }
        if other.cache.is_some() {
            self.cache = other.cache;
        }
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
    }

    /// Effective server section.
    pub fn server(&self) -> ServerSection {
        self.server.clone().unwrap_or_default()
    }

    /// Effective checkout section.
    pub fn checkout(&self) -> CheckoutSection {
        self.checkout.clone().unwrap_or_default()
    }

    /// Effective cache section.
    pub fn cache(&self) -> CacheSection {
        self.cache.clone().unwrap_or_default()
    }

    /// Effective catalog section.
    pub fn catalog(&self) -> CatalogSection {
        self.catalog.clone().unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        if let Some(server) = &self.server
            && server.url.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "server.url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(catalog) = &self.catalog
            && catalog.page_size == 0
        {
            return Err(ConfigError::InvalidValue {
                field: "catalog.page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(cache) = &self.cache
            && cache.max_entries == 0
        {
            return Err(ConfigError::InvalidValue {
                field: "cache.max_entries".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Base URL of the portal backend.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[checkout]`
///
/// The processor appends `application_id` and `session_id` query
/// parameters when it redirects back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSection {
    pub success_url: String,
    pub cancel_url: String,
    /// ISO 4217 currency code, lowercase.
    pub currency: String,
}

impl Default for CheckoutSection {
    fn default() -> Self {
        Self {
            success_url: "http://localhost:5173/payment-success".to_string(),
            cancel_url: "http://localhost:5173/payment-failed".to_string(),
            currency: "usd".to_string(),
        }
    }
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Seconds a fetched list stays fresh. Zero disables caching.
    pub ttl_secs: u64,
    /// Cached queries kept at once.
    pub max_entries: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

/// `[catalog]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub page_size: usize,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
