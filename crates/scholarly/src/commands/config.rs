//! Config command - configuration management.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use scholarly_config::PortalConfig;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show resolved configuration and where it came from
    Show,

    /// Show configuration file path
    Path,

    /// Write a config file with every default filled in
    Init {
        /// Create project-local config (./scholarly.toml) instead of user config
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Init { local, force } => cmd_init(ctx, local, force),
    }
}

/// The merged config with every section materialized.
fn resolved(ctx: &Context) -> PortalConfig {
    let mut server = ctx.config.server();
    server.url = ctx.server_url.clone();
    PortalConfig {
        server: Some(server),
        checkout: Some(ctx.config.checkout()),
        cache: Some(ctx.config.cache()),
        catalog: Some(ctx.config.catalog()),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = scholarly_config::load_config(None)?;
    let config = resolved(ctx);

    if ctx.json_output {
        return ctx.print_json(&json!({
            "config": config,
            "sources": loaded.loaded_from(),
            "warnings": loaded.warnings,
        }));
    }

    println!("# Scholarly Configuration\n");

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }
    for warning in &loaded.warnings {
        println!("warning: {}", warning);
    }

    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let user = scholarly_config::user_config_path();
    let credentials = ctx
        .config_dir
        .as_deref()
        .map(scholarly_config::credentials_path);

    if ctx.json_output {
        return ctx.print_json(&json!({
            "config": user,
            "credentials": credentials,
        }));
    }
    match user {
        Some(path) => println!("{}", path.display()),
        None => anyhow::bail!("Could not determine config directory"),
    }
    Ok(())
}

fn cmd_init(ctx: &Context, local: bool, force: bool) -> Result<()> {
    let path = if local {
        PathBuf::from("scholarly.toml")
    } else {
        scholarly_config::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
    };

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    scholarly_config::save_config(&resolved(ctx), &path)?;
    ctx.done(
        format!("Wrote {}", path.display()),
        json!({ "path": path }),
    )
}
