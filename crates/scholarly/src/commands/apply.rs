//! Apply command - submit an application.

use anyhow::Result;
use clap::Args;
use console::Style;

use scholarly_domain::Route;
use scholarly_types::ApplicantDetails;

use super::Context;

/// Arguments for the apply command.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Scholarship ID
    pub scholarship_id: String,

    #[command(flatten)]
    pub details: DetailArgs,
}

/// Applicant form fields. Required ones are checked before submitting.
#[derive(Args, Debug, Default)]
pub struct DetailArgs {
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Photo URL
    #[arg(long)]
    pub photo: Option<String>,

    #[arg(long, default_value = "")]
    pub village: String,

    #[arg(long, default_value = "")]
    pub district: String,

    #[arg(long, default_value = "")]
    pub country: String,

    #[arg(long, default_value = "")]
    pub gender: String,

    /// Degree applied for
    #[arg(long, default_value = "")]
    pub degree: String,

    /// SSC result
    #[arg(long, default_value = "")]
    pub ssc: String,

    /// HSC result
    #[arg(long, default_value = "")]
    pub hsc: String,

    #[arg(long)]
    pub study_gap: Option<String>,
}

impl From<DetailArgs> for ApplicantDetails {
    fn from(args: DetailArgs) -> Self {
        ApplicantDetails {
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

/// Run the apply command.
pub async fn run(args: ApplyArgs, ctx: &Context) -> Result<()> {
    let details: ApplicantDetails = args.details.into();
    // Catch blank fields before touching the network.
    scholarly_domain::validate_details(&details)?;

    let session = ctx.session()?;
    let scholarship = session
        .services
        .client()
        .scholarships()
        .get(&args.scholarship_id)
        .await?;
    let outcome = session
        .services
        .submission()
        .submit(&session.identity(), &scholarship, details)
        .await?;

    if ctx.json_output {
        return ctx.print_json(&outcome);
    }

    let green = Style::new().green();
    let dim = Style::new().dim();
    println!(
        "{} Applied to {} at {}",
        green.apply_to("✓"),
        scholarship.scholarship_name,
        scholarship.university_name
    );
    println!("  Application: {}", outcome.application_id);
    match &outcome.route {
        Route::PaymentPage(id) => {
            println!(
                "  {} {} due. Run 'scholarly pay {}' to complete it.",
                Style::new().yellow().apply_to("Payment"),
                scholarship.total_fee(),
                id
            );
        }
        route => {
            println!("  No fees due, marked {}.", outcome.payment_status);
            println!("  {}", dim.apply_to(format!("Track it under {}", route)));
        }
    }
    Ok(())
}
