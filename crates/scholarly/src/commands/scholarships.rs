//! Scholarships command - catalog browsing and listing management.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::json;

use scholarly_domain::{ScholarshipQuery, SortKey};
use scholarly_types::{NewScholarship, Scholarship};

use super::{Context, heading, truncate};

/// Arguments for the scholarships command.
#[derive(Args, Debug)]
pub struct ScholarshipsArgs {
    #[command(subcommand)]
    pub command: ScholarshipsCommand,
}

#[derive(Subcommand, Debug)]
pub enum ScholarshipsCommand {
    /// Search and page through all listings
    List {
        /// Match scholarship name, university or degree
        #[arg(short, long)]
        search: Option<String>,

        /// Funding category, e.g. "Full fund"
        #[arg(long)]
        category: Option<String>,

        /// Subject category
        #[arg(long)]
        subject: Option<String>,

        /// University country
        #[arg(long)]
        country: Option<String>,

        /// Sort by: fee, deadline, posted, rank
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show the featured scholarships
    Top,

    /// Show one scholarship with its reviews
    Show {
        /// Scholarship ID
        id: String,
    },

    /// Publish a scholarship from a JSON file (moderator)
    Add {
        /// Path to the listing as JSON
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete a scholarship (moderator)
    Delete {
        /// Scholarship ID
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Run the scholarships command.
pub async fn run(args: ScholarshipsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ScholarshipsCommand::List {
            search,
            category,
            subject,
            country,
            sort,
            desc,
            page,
        } => {
            let query = ScholarshipQuery {
                search,
                category,
                subject,
                country,
                sort,
                descending: desc,
                page,
            };
            cmd_list(ctx, &query).await
        }
        ScholarshipsCommand::Top => cmd_top(ctx).await,
        ScholarshipsCommand::Show { id } => cmd_show(ctx, &id).await,
        ScholarshipsCommand::Add { file } => cmd_add(ctx, &file).await,
        ScholarshipsCommand::Delete { id, yes } => cmd_delete(ctx, &id, yes).await,
    }
}

async fn cmd_list(ctx: &Context, query: &ScholarshipQuery) -> Result<()> {
    let page = ctx.services()?.catalog().browse(query).await?;
    if ctx.json_output {
        return ctx.print_json(&page);
    }

    heading("Scholarships");
    if page.items.is_empty() {
        println!("{}", Style::new().dim().apply_to("No scholarships found"));
        return Ok(());
    }
    print_rows(&page.items);
    println!();
    println!(
        "{}",
        Style::new().dim().apply_to(format!(
            "page {} of {} ({} total)",
            page.page, page.total_pages, page.total_items
        ))
    );
    Ok(())
}

async fn cmd_top(ctx: &Context) -> Result<()> {
    let top = ctx.services()?.catalog().top().await?;
    if ctx.json_output {
        return ctx.print_json(&top);
    }
    heading("Top Scholarships");
    print_rows(&top);
    Ok(())
}

async fn cmd_show(ctx: &Context, id: &str) -> Result<()> {
    let detail = ctx.services()?.catalog().detail(id).await?;
    if ctx.json_output {
        return ctx.print_json(&detail);
    }

    let s = &detail.scholarship;
    let dim = Style::new().dim();
    heading(&s.scholarship_name);
    println!("University:  {}", s.university_name);
    println!(
        "Location:    {}{}",
        s.university_city
            .as_deref()
            .map(|c| format!("{}, ", c))
            .unwrap_or_default(),
        s.university_country
    );
    if let Some(rank) = s.university_world_rank {
        println!("World rank:  {}", rank);
    }
    println!("Category:    {} / {}", s.scholarship_category, s.subject_category);
    println!("Degree:      {}", s.degree);
    println!(
        "Fees:        {} + {} service = {}",
        s.application_fees,
        s.service_charge,
        style(s.total_fee()).bold()
    );
    if let Some(deadline) = s.application_deadline {
        println!("Deadline:    {}", deadline);
    }
    if let Some(description) = &s.description {
        println!();
        println!("{}", description);
    }

    println!();
    match detail.average_rating {
        Some(avg) => println!("Reviews ({}, average {:.1}/5)", detail.reviews.len(), avg),
        None => println!("{}", dim.apply_to("No reviews yet")),
    }
    for review in &detail.reviews {
        println!(
            "  {} {} {}",
            "★".repeat(review.rating as usize),
            review.reviewer_name,
            dim.apply_to(truncate(&review.comment, 50))
        );
    }
    Ok(())
}

async fn cmd_add(ctx: &Context, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let scholarship: NewScholarship = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid scholarship listing", file.display()))?;

    let session = ctx.session()?;
    let actor = session.actor().await?;
    let id = session.services.catalog().publish(&actor, scholarship).await?;
    ctx.done(format!("Scholarship published: {}", id), json!({ "insertedId": id }))
}

async fn cmd_delete(ctx: &Context, id: &str, yes: bool) -> Result<()> {
    let session = ctx.session()?;
    let actor = session.actor().await?;
    session.services.catalog().delete(&actor, id, yes).await?;
    ctx.done(format!("Scholarship deleted: {}", id), json!({ "deleted": id }))
}

fn print_rows(items: &[Scholarship]) {
    let dim = Style::new().dim();
    for s in items {
        println!(
            "{} {:<32} {:<24} {:>8}  {}",
            dim.apply_to(format!("[{}]", s.id)),
            truncate(&s.scholarship_name, 32),
            truncate(&s.university_name, 24),
            s.total_fee().to_string(),
            dim.apply_to(
                s.application_deadline
                    .map(|d| format!("due {}", d))
                    .unwrap_or_default()
            ),
        );
    }
}
