//! CLI command handlers.

pub mod admin;
pub mod applications;
pub mod apply;
pub mod auth;
pub mod config;
pub mod moderate;
pub mod pay;
pub mod role;
pub mod scholarships;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use console::Style;
use serde_json::Value;
use tracing::warn;

use scholarly_client::ScholarlyClient;
use scholarly_config::{Credentials, PortalConfig};
use scholarly_domain::{Actor, CheckoutSettings, Identity, PortalServices, Route, ServiceSettings};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Backend URL to connect to.
    pub server_url: String,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Merged configuration.
    pub config: PortalConfig,
    /// Where credentials and logs live.
    pub config_dir: Option<PathBuf>,
}

/// A signed-in session: stored credentials plus services bound to them.
pub struct Session {
    pub credentials: Credentials,
    pub services: PortalServices,
}

impl Session {
    pub fn identity(&self) -> Identity {
        Identity {
            email: self.credentials.email.clone(),
            name: self.credentials.display_name().to_string(),
            photo: self.credentials.photo.clone(),
        }
    }

    /// Resolve the role and pair it with the identity.
    ///
    /// Fails when the backend rejects the session during the lookup.
    pub async fn actor(&self) -> Result<Actor> {
        let role = self
            .services
            .resolve_role(self.credentials.email.clone())
            .confirmed()
            .await?;
        Ok(Actor::new(self.identity(), role))
    }
}

impl Context {
    fn config_dir(&self) -> Result<&PathBuf> {
        self.config_dir
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn credentials(&self) -> Result<Option<Credentials>> {
        Ok(scholarly_config::load_credentials(self.config_dir()?)?)
    }

    /// Build a client, attaching `token` when present.
    ///
    /// A 401/403 from the backend deletes the stored credentials.
    pub fn client(&self, token: Option<&str>) -> Result<ScholarlyClient> {
        let mut builder = ScholarlyClient::builder()
            .base_url(&self.server_url)
            .timeout(Duration::from_secs(self.config.server().timeout_secs));
        if let Some(token) = token {
            builder = builder.auth_token(token);
        }

        let config_dir = self.config_dir.clone();
        builder = builder.on_unauthorized(move |status: u16| {
            if let Some(dir) = &config_dir
                && let Err(e) = scholarly_config::clear_credentials(dir)
            {
                warn!(error = %e, "could not remove stored credentials");
            }
            warn!(status, redirect = %Route::Login, "session rejected, credentials cleared");
        });

        builder
            .build()
            .with_context(|| format!("Invalid server URL: {}", self.server_url))
    }

    pub fn settings(&self) -> ServiceSettings {
        let checkout = self.config.checkout();
        let cache = self.config.cache();
        ServiceSettings {
            cache_ttl: Duration::from_secs(cache.ttl_secs),
            cache_capacity: cache.max_entries,
            page_size: self.config.catalog().page_size,
            checkout: CheckoutSettings {
                success_url: checkout.success_url,
                cancel_url: checkout.cancel_url,
                currency: checkout.currency,
            },
        }
    }

    /// Services for anonymous browsing, authenticated if a session exists.
    pub fn services(&self) -> Result<PortalServices> {
        let credentials = self.credentials()?;
        let client = self.client(credentials.as_ref().map(|c| c.token.as_str()))?;
        Ok(PortalServices::new(client, self.settings()))
    }

    /// Services for commands that need a signed-in account.
    pub fn session(&self) -> Result<Session> {
        let credentials = self
            .credentials()?
            .ok_or_else(|| anyhow::anyhow!("Not signed in. Run 'scholarly auth login' first."))?;
        let client = self.client(Some(&credentials.token))?;
        Ok(Session {
            services: PortalServices::new(client, self.settings()),
            credentials,
        })
    }

    pub fn print_json(&self, value: &impl serde::Serialize) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print `value` as JSON, or `message` with a check mark.
    pub fn done(&self, message: impl AsRef<str>, value: Value) -> Result<()> {
        if self.json_output {
            return self.print_json(&value);
        }
        let green = Style::new().green();
        println!("{} {}", green.apply_to("✓"), message.as_ref());
        Ok(())
    }
}

/// Bold title plus rule.
pub fn heading(title: &str) {
    let dim = Style::new().dim();
    println!("{}", console::style(title).bold());
    println!("{}", dim.apply_to("─".repeat(60)));
}

pub fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_len {
        s
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Try to open a URL in the default browser.
pub fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).status()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).status()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .status()?;
    }
    Ok(())
}
