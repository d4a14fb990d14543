//! Scholarly - scholarship portal command line
//!
//! Main entry point for the Scholarly CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::Style;
use tracing::warn;

mod commands;

use commands::{admin, applications, apply, auth, config, moderate, pay, role, scholarships};
use scholarly_domain::{DomainError, SESSION_EXPIRED, ViewScope};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Scholarly - browse scholarships, apply, pay and moderate from the terminal
#[derive(Parser)]
#[command(name = "scholarly")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend URL (default: from config, then http://localhost:5000)
    #[arg(long, global = true, env = "SCHOLARLY_SERVER_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, check or clear the stored session
    Auth(auth::AuthArgs),

    /// Show the role of the signed-in account
    Role(role::RoleArgs),

    /// Browse and manage scholarship listings
    Scholarships(scholarships::ScholarshipsArgs),

    /// Apply to a scholarship
    Apply(apply::ApplyArgs),

    /// Open checkout for an unpaid application
    Pay(pay::PayArgs),

    /// Reconcile a checkout return
    Payment(pay::PaymentArgs),

    /// Track your own applications
    Applications(applications::ApplicationsArgs),

    /// Moderator review table
    Moderate(moderate::ModerateArgs),

    /// User administration and analytics
    Admin(admin::AdminArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "scholarly=debug,scholarly_client=debug,scholarly_domain=debug,scholarly_config=debug,info"
    } else {
        "scholarly=warn,scholarly_client=warn,scholarly_domain=warn,scholarly_config=warn,error"
    };

    let log_dir = scholarly_config::user_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "scholarly.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "scholarly=trace,scholarly_client=trace,scholarly_domain=trace,scholarly_config=trace,info",
                )),
        )
        .init();

    if let Err(e) = run(cli).await {
        let red = Style::new().red().bold();
        eprintln!("{} {}", red.apply_to("Error:"), describe(&e));
        // exit() skips destructors; flush the file log first.
        drop(guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let loaded = scholarly_config::load_config(None)?;
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    let server_url = cli
        .server
        .unwrap_or_else(|| loaded.config.server().url);

    let ctx = commands::Context {
        server_url,
        json_output: cli.json,
        verbose: cli.verbose,
        config: loaded.config,
        config_dir: scholarly_config::user_config_dir(),
    };

    // One scope per invocation; Ctrl-C abandons whatever is in flight.
    let scope = ViewScope::new();
    let interrupt = scope.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    scope.run(dispatch(cli.command, &ctx)).await
}

async fn dispatch(command: Commands, ctx: &commands::Context) -> Result<()> {
    match command {
        Commands::Auth(args) => auth::run(args, ctx).await,
        Commands::Role(args) => role::run(args, ctx).await,
        Commands::Scholarships(args) => scholarships::run(args, ctx).await,
        Commands::Apply(args) => apply::run(args, ctx).await,
        Commands::Pay(args) => pay::run(args, ctx).await,
        Commands::Payment(args) => pay::run_return(args, ctx).await,
        Commands::Applications(args) => applications::run(args, ctx).await,
        Commands::Moderate(args) => moderate::run(args, ctx).await,
        Commands::Admin(args) => admin::run(args, ctx).await,
        Commands::Config(args) => config::run(args, ctx).await,
    }
}

/// Domain failures carry their own user-facing wording.
fn describe(error: &anyhow::Error) -> String {
    if let Some(domain) = error.downcast_ref::<DomainError>() {
        return domain.user_message();
    }
    match error.downcast_ref::<scholarly_client::Error>() {
        Some(client) if client.is_auth_error() => SESSION_EXPIRED.to_string(),
        _ => error.to_string(),
    }
}
