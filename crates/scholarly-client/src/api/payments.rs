//! Payments API.

use crate::client::ScholarlyClient;
use crate::error::Result;
use crate::types::{CheckoutRequest, CheckoutSession};

/// Payments API client.
///
/// The backend creates the session with the payment processor; this side
/// only receives the hosted page URL.
pub struct PaymentsApi {
    client: ScholarlyClient,
}

impl PaymentsApi {
    pub(crate) fn new(client: ScholarlyClient) -> Self {
        Self { client }
    }

    /// Open a checkout session.
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession> {
        self.client.post(&["create-checkout-session"], request).await
    }
}
