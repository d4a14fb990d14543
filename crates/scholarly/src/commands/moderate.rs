//! Moderate command - the review table.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use serde_json::json;

use scholarly_domain::{ApplicationFilter, NO_APPLICATIONS_MESSAGE};
use scholarly_types::ApplicationStatus;

use super::{Context, heading, truncate};

/// Arguments for the moderate command.
#[derive(Args, Debug)]
pub struct ModerateArgs {
    #[command(subcommand)]
    pub command: ModerateCommand,
}

#[derive(Subcommand, Debug)]
pub enum ModerateCommand {
    /// List applications, optionally filtered
    List {
        /// Match applicant name, email or university
        #[arg(short, long)]
        search: Option<String>,

        /// pending, processing, completed or rejected
        #[arg(long)]
        status: Option<ApplicationStatus>,

        /// Funding category
        #[arg(long)]
        category: Option<String>,
    },

    /// Move an application to a new status
    Status {
        /// Application ID
        id: String,

        /// pending, processing, completed or rejected
        status: ApplicationStatus,
    },

    /// Leave feedback for the applicant
    Feedback {
        /// Application ID
        id: String,

        /// Feedback text
        text: String,
    },

    /// Delete an application
    Delete {
        /// Application ID
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Run the moderate command.
pub async fn run(args: ModerateArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let actor = session.actor().await?;
    let moderation = session.services.moderation();

    match args.command {
        ModerateCommand::List {
            search,
            status,
            category,
        } => {
            let filter = ApplicationFilter {
                search,
                status,
                category,
            };
            let rows = moderation.filtered(&actor, &filter).await?;
            if ctx.json_output {
                return ctx.print_json(&rows);
            }

            let dim = Style::new().dim();
            heading("Applications");
            if rows.is_empty() {
                println!("{}", dim.apply_to(NO_APPLICATIONS_MESSAGE));
                return Ok(());
            }
            for app in &rows {
                println!(
                    "{} {:<20} {:<26} {:<20} {:<11} {}",
                    dim.apply_to(format!("[{}]", app.id)),
                    truncate(&app.user_name, 20),
                    truncate(&app.user_email, 26),
                    truncate(&app.snapshot.university_name, 20),
                    app.application_status.as_str(),
                    app.payment_status,
                );
            }
            println!();
            println!("{}", dim.apply_to(format!("{} applications", rows.len())));
            Ok(())
        }
        ModerateCommand::Status { id, status } => {
            moderation.set_status(&actor, &id, status).await?;
            ctx.done(
                format!("Application {} is now {}", id, status),
                json!({ "id": id, "applicationStatus": status }),
            )
        }
        ModerateCommand::Feedback { id, text } => {
            moderation.set_feedback(&actor, &id, &text).await?;
            ctx.done(format!("Feedback saved for {}", id), json!({ "id": id }))
        }
        ModerateCommand::Delete { id, yes } => {
            moderation.delete(&actor, &id, yes).await?;
            ctx.done(format!("Application {} deleted", id), json!({ "deleted": id }))
        }
    }
}
