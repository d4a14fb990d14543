//! Payment handoff.
//!
//! The portal never sees card data. It opens a hosted checkout session,
//! sends the browser there, and reconciles whichever return URL the
//! processor redirects back to.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};
use url::Url;

use scholarly_client::{CheckoutRequest, PaymentPatch, ScholarlyClient};
use scholarly_types::{Application, Id, PaymentStatus};

use crate::cache::{QueryCache, keys};
use crate::error::{DomainError, Result, RuleViolation};
use crate::routes::Route;

/// Placeholder the processor substitutes with the session id on return.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Return URLs and currency for checkout sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
    pub success_url: String,
    pub cancel_url: String,
    pub currency: String,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            success_url: "http://localhost:5173/payment-success".to_string(),
            cancel_url: "http://localhost:5173/payment-failed".to_string(),
            currency: "usd".to_string(),
        }
    }
}

impl CheckoutSettings {
    /// Success URL for one application, carrying its id and the session
    /// placeholder.
    pub fn success_url_for(&self, application_id: &str) -> Result<String> {
        let url = with_application_id(&self.success_url, application_id)?;
        Ok(format!("{}&session_id={}", url, SESSION_ID_PLACEHOLDER))
    }

    /// Cancel URL for one application.
    pub fn cancel_url_for(&self, application_id: &str) -> Result<String> {
        Ok(with_application_id(&self.cancel_url, application_id)?.to_string())
    }
}

fn with_application_id(base: &str, application_id: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| DomainError::InvalidInput(format!("return URL {}: {}", base, e)))?;
    url.query_pairs_mut()
        .append_pair("application_id", application_id);
    Ok(url)
}

/// What the payment page shows before checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub application_id: Id,
    pub applicant_name: String,
    pub applicant_email: String,
    pub scholarship_name: String,
    pub university_name: String,
    pub application_fees: Decimal,
    pub service_charge: Decimal,
    pub total: Decimal,
    pub payment_status: PaymentStatus,
}

impl CostSummary {
    pub fn of(application: &Application) -> Self {
        Self {
            application_id: application.id.clone(),
            applicant_name: application.user_name.clone(),
            applicant_email: application.user_email.clone(),
            scholarship_name: application.snapshot.scholarship_name.clone(),
            university_name: application.snapshot.university_name.clone(),
            application_fees: application.snapshot.application_fees,
            service_charge: application.snapshot.service_charge,
            total: application.total_fee(),
            payment_status: application.payment_status,
        }
    }
}

/// Query carried by a checkout return URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnQuery {
    pub application_id: Id,
    pub session_id: Option<String>,
}

impl ReturnQuery {
    pub fn new(application_id: impl Into<Id>, session_id: Option<String>) -> Self {
        Self {
            application_id: application_id.into(),
            session_id,
        }
    }

    /// Read `application_id` and `session_id` from a return URL.
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| DomainError::InvalidInput(format!("return URL: {}", e)))?;

        let mut application_id = None;
        let mut session_id = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "application_id" if !value.is_empty() => application_id = Some(value.into_owned()),
                "session_id" if !value.is_empty() && value != SESSION_ID_PLACEHOLDER => {
                    session_id = Some(value.into_owned())
                }
                _ => {}
            }
        }

        let application_id = application_id.ok_or_else(|| {
            DomainError::InvalidInput("return URL has no application_id".to_string())
        })?;
        Ok(Self {
            application_id,
            session_id,
        })
    }
}

/// Result of reconciling a successful return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub application_id: Id,
    pub transaction_id: Option<String>,
    /// False when the application was already paid and nothing was sent.
    pub reconciled: bool,
}

/// Where `begin_checkout` leaves the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Checkout {
    /// Send the browser to the processor's hosted page.
    Redirect { url: String },
    /// Nothing was due; the application was marked paid directly.
    Settled(PaymentReceipt),
}

/// Checkout handoff and return reconciliation.
pub struct PaymentService {
    client: ScholarlyClient,
    cache: Arc<QueryCache>,
    settings: CheckoutSettings,
}

impl PaymentService {
    pub(crate) fn new(
        client: ScholarlyClient,
        cache: Arc<QueryCache>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            client,
            cache,
            settings,
        }
    }

    pub async fn summary(&self, application_id: &str) -> Result<CostSummary> {
        let application = self.client.applications().get(application_id).await?;
        Ok(CostSummary::of(&application))
    }

    /// Open a checkout session for an unpaid application.
    ///
    /// An application with nothing to pay (a free scholarship whose paid
    /// flag was never written at submission) is settled here instead.
    #[instrument(skip(self))]
    pub async fn begin_checkout(&self, application_id: &str) -> Result<Checkout> {
        let application = self.client.applications().get(application_id).await?;
        if application.payment_status.is_paid() {
            return Err(RuleViolation::AlreadyPaid.into());
        }
        let amount = application.total_fee();
        if amount.is_zero() {
            self.client
                .applications()
                .set_payment(&application.id, &PaymentPatch::paid(None))
                .await?;
            self.cache.invalidate(keys::APPLICATIONS);
            info!(application = %application.id, "nothing due, marked paid");
            return Ok(Checkout::Settled(PaymentReceipt {
                application_id: application.id,
                transaction_id: None,
                reconciled: true,
            }));
        }

        let request = CheckoutRequest {
            application_id: application.id.clone(),
            applicant_name: application.user_name.clone(),
            applicant_email: application.user_email.clone(),
            scholarship_name: application.snapshot.scholarship_name.clone(),
            university_name: application.snapshot.university_name.clone(),
            amount,
            currency: self.settings.currency.clone(),
            success_url: self.settings.success_url_for(&application.id)?,
            cancel_url: self.settings.cancel_url_for(&application.id)?,
        };
        let session = self.client.payments().create_checkout_session(&request).await?;
        info!(application = %application.id, session = ?session.id, %amount, "checkout session opened");
        Ok(Checkout::Redirect { url: session.url })
    }

    /// Record a successful payment.
    ///
    /// Returns early when the application is already paid, so replaying
    /// the same return URL does not overwrite the original transaction.
    #[instrument(skip(self), fields(application = %query.application_id))]
    pub async fn reconcile_success(&self, query: &ReturnQuery) -> Result<PaymentReceipt> {
        let application = self.client.applications().get(&query.application_id).await?;
        if application.payment_status.is_paid() {
            info!("already paid, nothing to reconcile");
            return Ok(PaymentReceipt {
                application_id: application.id,
                transaction_id: application.transaction_id,
                reconciled: false,
            });
        }

        self.client
            .applications()
            .set_payment(
                &query.application_id,
                &PaymentPatch::paid(query.session_id.clone()),
            )
            .await?;
        self.cache.invalidate(keys::APPLICATIONS);
        info!(session = ?query.session_id, "payment reconciled");

        Ok(PaymentReceipt {
            application_id: query.application_id.clone(),
            transaction_id: query.session_id.clone(),
            reconciled: true,
        })
    }

    /// Handle a cancelled or failed checkout. The application stays
    /// unpaid; the caller is sent back to the payment page to retry.
    pub fn reconcile_failure(&self, query: &ReturnQuery) -> Route {
        warn!(application = %query.application_id, "checkout cancelled");
        Route::PaymentPage(query.application_id.clone())
    }
}
