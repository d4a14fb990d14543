//! Role command - show the resolved role.

use anyhow::Result;
use clap::Args;
use console::Style;
use serde_json::json;

use super::Context;

/// Arguments for the role command.
#[derive(Args, Debug)]
pub struct RoleArgs {}

/// Run the role command.
pub async fn run(_args: RoleArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let mut resolver = session
        .services
        .resolve_role(session.credentials.email.clone());

    if ctx.verbose && resolver.is_loading() {
        let dim = Style::new().dim();
        eprintln!(
            "{}",
            dim.apply_to(format!("resolving (acting as {} meanwhile)", resolver.final_role()))
        );
    }
    let role = resolver.confirmed().await?;

    if ctx.json_output {
        return ctx.print_json(&json!({
            "email": session.credentials.email,
            "role": role,
        }));
    }
    println!("{} ({})", role, session.credentials.email);
    Ok(())
}
