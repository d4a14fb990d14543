//! Admin command - users and analytics.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::json;

use scholarly_types::Role;

use super::{Context, heading, truncate};

/// Arguments for the admin command.
#[derive(Args, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List registered users
    Users {
        /// Only users with this role
        #[arg(long)]
        role: Option<Role>,
    },

    /// Change a user's role
    SetRole {
        /// User ID
        user_id: String,

        /// student, moderator or admin
        role: Role,
    },

    /// Remove a user
    DeleteUser {
        /// User ID
        user_id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Portal-wide figures
    Analytics,
}

/// Run the admin command.
pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let actor = session.actor().await?;

    match args.command {
        AdminCommand::Users { role } => {
            let users = session.services.users().list(&actor, role).await?;
            if ctx.json_output {
                return ctx.print_json(&users);
            }
            let dim = Style::new().dim();
            heading("Users");
            for user in &users {
                println!(
                    "{} {:<24} {:<30} {}",
                    dim.apply_to(format!("[{}]", user.id.as_deref().unwrap_or("-"))),
                    truncate(&user.name, 24),
                    truncate(&user.email, 30),
                    user.role(),
                );
            }
            Ok(())
        }
        AdminCommand::SetRole { user_id, role } => {
            session
                .services
                .users()
                .set_role(&actor, &user_id, role)
                .await?;
            ctx.done(
                format!("{} is now {}", user_id, role),
                json!({ "id": user_id, "role": role }),
            )
        }
        AdminCommand::DeleteUser { user_id, yes } => {
            session
                .services
                .users()
                .delete(&actor, &user_id, yes)
                .await?;
            ctx.done(format!("User {} deleted", user_id), json!({ "deleted": user_id }))
        }
        AdminCommand::Analytics => {
            let analytics = session.services.analytics();
            let summary = analytics.summary(&actor).await?;
            let server_counts = analytics.server_status_counts(&actor).await?;
            if ctx.json_output {
                return ctx.print_json(&json!({
                    "summary": summary,
                    "serverStatusCounts": server_counts,
                }));
            }

            let dim = Style::new().dim();
            heading("Analytics");
            println!("Scholarships:   {}", summary.total_scholarships);
            println!("Applications:   {}", summary.total_applications);
            println!("Reviews:        {}", summary.total_reviews);
            println!(
                "Average rating: {}",
                summary
                    .average_rating
                    .map(|r| format!("{:.1}", r))
                    .unwrap_or_else(|| "-".to_string())
            );
            println!();
            println!("{}", style("By status").bold());
            for (status, count) in &summary.by_status {
                let server = server_counts
                    .iter()
                    .find(|c| c.status == *status)
                    .map(|c| c.count)
                    .unwrap_or(0);
                println!(
                    "  {:<11} {:>5}  {}",
                    status.as_str(),
                    count,
                    dim.apply_to(format!("server {}", server))
                );
            }
            println!();
            println!("{}", style("Payments").bold());
            println!("  paid   {:>5}", summary.paid);
            println!("  unpaid {:>5}", summary.unpaid);
            println!("  collected {}", summary.collected_fees);
            println!();
            println!("{}", style("By category").bold());
            for (category, count) in &summary.by_category {
                println!("  {:<20} {:>5}", truncate(category, 20), count);
            }
            Ok(())
        }
    }
}
