//! Pay and payment commands - checkout handoff and return reconciliation.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::json;

use scholarly_domain::{Checkout, ReturnQuery};

use super::{Context, open_url};

/// Arguments for the pay command.
#[derive(Args, Debug)]
pub struct PayArgs {
    /// Application ID
    pub application_id: String,

    /// Print the checkout URL instead of opening a browser
    #[arg(long)]
    pub no_open: bool,
}

/// Run the pay command.
pub async fn run(args: PayArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let payment = session.services.payment();

    let summary = payment.summary(&args.application_id).await?;
    let url = match payment.begin_checkout(&args.application_id).await? {
        Checkout::Redirect { url } => url,
        Checkout::Settled(receipt) => {
            if ctx.json_output {
                return ctx.print_json(&json!({ "summary": summary, "receipt": receipt }));
            }
            return ctx.done(
                format!("Nothing due; {} marked paid", receipt.application_id),
                json!(null),
            );
        }
    };

    if ctx.json_output {
        return ctx.print_json(&json!({ "summary": summary, "checkoutUrl": url }));
    }

    println!("{}", style("Payment").bold());
    println!("  {} at {}", summary.scholarship_name, summary.university_name);
    println!("  Application fee: {}", summary.application_fees);
    println!("  Service charge:  {}", summary.service_charge);
    println!("  Total:           {}", style(summary.total).bold());
    println!();

    if !args.no_open && open_url(&url).is_ok() {
        println!("Opened checkout in your browser.");
    } else {
        println!("Complete payment at:");
    }
    println!("  {}", url);
    Ok(())
}

/// Arguments for the payment command.
#[derive(Args, Debug)]
pub struct PaymentArgs {
    #[command(subcommand)]
    pub command: PaymentCommand,
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    /// Record a successful checkout
    Success {
        #[arg(long, required_unless_present = "url")]
        application_id: Option<String>,

        #[arg(long)]
        session_id: Option<String>,

        /// The full return URL from the browser
        #[arg(long, conflicts_with_all = ["application_id", "session_id"])]
        url: Option<String>,
    },

    /// Record a cancelled checkout
    Cancel {
        #[arg(long, required_unless_present = "url")]
        application_id: Option<String>,

        /// The full return URL from the browser
        #[arg(long, conflicts_with = "application_id")]
        url: Option<String>,
    },
}

fn return_query(
    url: Option<String>,
    application_id: Option<String>,
    session_id: Option<String>,
) -> Result<ReturnQuery> {
    match (url, application_id) {
        (Some(url), _) => Ok(ReturnQuery::parse(&url)?),
        (None, Some(id)) => Ok(ReturnQuery::new(id, session_id)),
        (None, None) => anyhow::bail!("Pass --application-id or --url"),
    }
}

/// Run the payment command.
pub async fn run_return(args: PaymentArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let payment = session.services.payment();

    match args.command {
        PaymentCommand::Success {
            application_id,
            session_id,
            url,
        } => {
            let query = return_query(url, application_id, session_id)?;
            let receipt = payment.reconcile_success(&query).await?;
            if ctx.json_output {
                return ctx.print_json(&receipt);
            }
            let message = if receipt.reconciled {
                format!("Payment recorded for {}", receipt.application_id)
            } else {
                format!("{} was already paid", receipt.application_id)
            };
            ctx.done(message, json!(null))
        }
        PaymentCommand::Cancel {
            application_id,
            url,
        } => {
            let query = return_query(url, application_id, None)?;
            let route = payment.reconcile_failure(&query);
            if ctx.json_output {
                return ctx.print_json(&json!({ "route": route.path() }));
            }
            let yellow = Style::new().yellow();
            println!("{} Payment was not completed.", yellow.apply_to("!"));
            println!(
                "  Retry with 'scholarly pay {}' ({})",
                query.application_id, route
            );
            Ok(())
        }
    }
}
