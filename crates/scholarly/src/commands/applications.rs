//! Applications command - a student's own applications.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::json;

use scholarly_domain::TrackingRow;
use scholarly_types::{ApplicantDetailsPatch, ApplicationStatus, ReviewPatch};

use super::{Context, heading, truncate};

/// Arguments for the applications command.
#[derive(Args, Debug)]
pub struct ApplicationsArgs {
    #[command(subcommand)]
    pub command: ApplicationsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ApplicationsCommand {
    /// List your applications and what you can do with each
    Mine,

    /// Change personal or education details of a pending application
    Edit {
        /// Application ID
        id: String,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// Withdraw a pending application
    Delete {
        /// Application ID
        id: String,
    },

    /// Review a completed application
    Review {
        /// Application ID
        id: String,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: u8,

        #[arg(long, default_value = "")]
        comment: String,
    },

    /// List the reviews you have written
    Reviews,

    /// Change the rating or comment of one of your reviews
    EditReview {
        /// Review ID
        id: String,

        #[arg(long)]
        rating: Option<u8>,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete one of your reviews
    DeleteReview {
        /// Review ID
        id: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub photo: Option<String>,
    #[arg(long)]
    pub village: Option<String>,
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub degree: Option<String>,
    #[arg(long)]
    pub ssc: Option<String>,
    #[arg(long)]
    pub hsc: Option<String>,
    #[arg(long)]
    pub study_gap: Option<String>,
}

impl From<EditArgs> for ApplicantDetailsPatch {
    fn from(args: EditArgs) -> Self {
        ApplicantDetailsPatch {
            phone: args.phone,
            photo: args.photo,
            village: args.village,
            district: args.district,
            country: args.country,
            gender: args.gender,
            applying_degree: args.degree,
            ssc_result: args.ssc,
            hsc_result: args.hsc,
            study_gap: args.study_gap,
        }
    }
}

/// Run the applications command.
pub async fn run(args: ApplicationsArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let identity = session.identity();
    let tracking = session.services.tracking();

    match args.command {
        ApplicationsCommand::Mine => {
            let rows = tracking.rows(&identity).await?;
            if ctx.json_output {
                return ctx.print_json(&rows);
            }
            heading("My Applications");
            if rows.is_empty() {
                println!("{}", Style::new().dim().apply_to("No applications yet"));
            }
            for row in &rows {
                print_row(row);
            }
            Ok(())
        }
        ApplicationsCommand::Edit { id, fields } => {
            let patch: ApplicantDetailsPatch = fields.into();
            if patch.is_empty() {
                anyhow::bail!("Nothing to change. Pass at least one field, e.g. --phone");
            }
            tracking.edit(&identity, &id, &patch).await?;
            ctx.done(format!("Application {} updated", id), json!({ "updated": id }))
        }
        ApplicationsCommand::Delete { id } => {
            tracking.delete(&identity, &id).await?;
            ctx.done(format!("Application {} withdrawn", id), json!({ "deleted": id }))
        }
        ApplicationsCommand::Review {
            id,
            rating,
            comment,
        } => {
            let review_id = tracking.add_review(&identity, &id, rating, &comment).await?;
            ctx.done(
                format!("Review posted for {}", id),
                json!({ "insertedId": review_id }),
            )
        }
        ApplicationsCommand::Reviews => {
            let reviews = tracking.my_reviews(&identity).await?;
            if ctx.json_output {
                return ctx.print_json(&reviews);
            }
            let dim = Style::new().dim();
            heading("My Reviews");
            if reviews.is_empty() {
                println!("{}", dim.apply_to("No reviews yet"));
            }
            for review in &reviews {
                println!(
                    "{} {:<28} {} {}",
                    dim.apply_to(format!("[{}]", review.id)),
                    truncate(&review.scholarship_name, 28),
                    "★".repeat(review.rating as usize),
                    dim.apply_to(truncate(&review.comment, 40)),
                );
            }
            Ok(())
        }
        ApplicationsCommand::EditReview {
            id,
            rating,
            comment,
        } => {
            if rating.is_none() && comment.is_none() {
                anyhow::bail!("Nothing to change. Pass --rating or --comment");
            }
            let patch = ReviewPatch { rating, comment };
            tracking.edit_review(&identity, &id, &patch).await?;
            ctx.done(format!("Review {} updated", id), json!({ "updated": id }))
        }
        ApplicationsCommand::DeleteReview { id } => {
            tracking.delete_review(&identity, &id).await?;
            ctx.done(format!("Review {} deleted", id), json!({ "deleted": id }))
        }
    }
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Pending => Style::new().yellow(),
        ApplicationStatus::Processing => Style::new().cyan(),
        ApplicationStatus::Completed => Style::new().green(),
        ApplicationStatus::Rejected => Style::new().red(),
    }
}

fn print_row(row: &TrackingRow) {
    let dim = Style::new().dim();
    let app = &row.application;
    let university = row
        .scholarship
        .as_ref()
        .map(|s| s.university_name.as_str())
        .unwrap_or(&app.snapshot.university_name);

    let mut actions = Vec::new();
    if row.actions.can_edit {
        actions.push("edit");
    }
    if row.actions.can_delete {
        actions.push("delete");
    }
    if row.actions.can_review {
        actions.push("review");
    }

    println!(
        "{} {:<24} {:<11} {:<7} {}",
        dim.apply_to(format!("[{}]", app.id)),
        truncate(university, 24),
        status_style(app.application_status).apply_to(app.application_status.as_str()),
        app.payment_status.as_str(),
        dim.apply_to(actions.join(", ")),
    );
    if let Some(feedback) = app.feedback.as_deref().filter(|f| !f.is_empty()) {
        println!("    {} {}", style("feedback:").italic(), truncate(feedback, 60));
    }
}
