//! Auth command - session management.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use serde_json::json;

use scholarly_config::Credentials;
use scholarly_types::User;

use super::Context;

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store an ID token issued by the identity provider
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// ID token to send as the bearer credential
        #[arg(long, env = "SCHOLARLY_TOKEN", hide_env_values = true)]
        token: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Profile photo URL
        #[arg(long)]
        photo: Option<String>,
    },

    /// Show the stored session
    Status,

    /// Forget the stored session
    Logout,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Login {
            email,
            token,
            name,
            photo,
        } => cmd_login(ctx, email, token, name, photo).await,
        AuthCommand::Status => cmd_status(ctx),
        AuthCommand::Logout => cmd_logout(ctx),
    }
}

async fn cmd_login(
    ctx: &Context,
    email: String,
    token: String,
    name: Option<String>,
    photo: Option<String>,
) -> Result<()> {
    let dir = ctx
        .config_dir
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let mut credentials = Credentials::new(email, token);
    credentials.name = name;
    credentials.photo = photo;

    // Register the account; the backend ignores emails it already knows.
    let client = ctx.client(Some(&credentials.token))?;
    let mut user = User::new(credentials.display_name(), &credentials.email);
    user.photo = credentials.photo.clone();
    if let Err(e) = client.users().create(&user).await {
        if e.is_auth_error() {
            anyhow::bail!("The backend rejected this token");
        }
        let yellow = Style::new().yellow();
        eprintln!(
            "{} could not register account with {}: {}",
            yellow.apply_to("Warning:"),
            ctx.server_url,
            e
        );
    }

    scholarly_config::save_credentials(dir, &credentials)?;
    ctx.done(
        format!("Signed in as {}", credentials.display_name()),
        json!({ "email": credentials.email, "name": credentials.name }),
    )
}

fn cmd_status(ctx: &Context) -> Result<()> {
    let credentials = ctx.credentials()?;

    if ctx.json_output {
        return ctx.print_json(&json!({
            "signedIn": credentials.is_some(),
            "email": credentials.as_ref().map(|c| c.email.as_str()),
            "server": ctx.server_url,
        }));
    }

    println!("Authentication Status");
    println!("---------------------");
    match credentials {
        Some(c) => {
            println!("Signed in: {}", c.display_name());
            println!("  Email: {}", c.email);
            println!("  Token: {}", mask(&c.token));
        }
        None => {
            println!("Not signed in");
            println!("  Run 'scholarly auth login --email <email> --token <token>'");
        }
    }
    println!("Server: {}", ctx.server_url);
    Ok(())
}

fn cmd_logout(ctx: &Context) -> Result<()> {
    let dir = ctx
        .config_dir
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    if scholarly_config::clear_credentials(dir)? {
        ctx.done("Signed out", json!({ "signedOut": true }))
    } else {
        ctx.done("No stored session", json!({ "signedOut": false }))
    }
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}
