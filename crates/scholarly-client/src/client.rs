//! Main client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, warn};
use url::Url;

use crate::api::{ApplicationsApi, DashboardApi, PaymentsApi, ReviewsApi, ScholarshipsApi, UsersApi};
use crate::error::{Error, ErrorResponse, Result};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Called when the backend answers 401 or 403.
///
/// This is the hook for a forced logout: the client has already dropped
/// its token by the time the handler runs, and the handler decides what
/// else to discard (stored credentials, cached views) and where to send
/// the user.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self, status: u16);
}

impl<F> UnauthorizedHandler for F
where
    F: Fn(u16) + Send + Sync,
{
    fn on_unauthorized(&self, status: u16) {
        self(status)
    }
}

/// Scholarly API client.
///
/// Provides typed access to all portal backend endpoints.
///
/// # Example
///
/// ```no_run
/// use scholarly_client::ScholarlyClient;
///
/// # async fn example() -> scholarly_client::Result<()> {
/// let client = ScholarlyClient::builder()
///     .base_url("http://localhost:5000")
///     .auth_token("id-token")
///     .build()?;
///
/// let scholarships = client.scholarships().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ScholarlyClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    /// Bearer credential. Cleared on 401/403.
    token: RwLock<Option<String>>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl fmt::Debug for ScholarlyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScholarlyClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl ScholarlyClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether a bearer token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.inner.token.read().is_some()
    }

    /// Replace the bearer token (e.g. after signing in again).
    pub fn set_auth_token(&self, token: impl Into<String>) {
        *self.inner.token.write() = Some(token.into());
    }

    /// Drop the bearer token. Later requests go out unauthenticated.
    pub fn logout(&self) {
        *self.inner.token.write() = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the scholarships API.
    pub fn scholarships(&self) -> ScholarshipsApi {
        ScholarshipsApi::new(self.clone())
    }

    /// Access the applications API.
    pub fn applications(&self) -> ApplicationsApi {
        ApplicationsApi::new(self.clone())
    }

    /// Access the reviews API.
    pub fn reviews(&self) -> ReviewsApi {
        ReviewsApi::new(self.clone())
    }

    /// Access the payments API.
    pub fn payments(&self) -> PaymentsApi {
        PaymentsApi::new(self.clone())
    }

    /// Access the dashboard API.
    pub fn dashboard(&self) -> DashboardApi {
        DashboardApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL under the base from path segments.
    ///
    /// Each segment is percent-encoded on its own, so an id containing
    /// `/`, `?` or `#` cannot reach a different route.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(Error::InvalidPath(bad.to_string()));
        }
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("base_url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach the bearer token and timeout, then send.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let request = match self.inner.token.read().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.timeout(self.inner.timeout).send().await?;
        debug!(
            url = %response.url(),
            status = response.status().as_u16(),
            "backend response"
        );
        Ok(response)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        let url = self.url(path)?;
        let response = self.send(self.inner.http.get(url)).await?;
        self.handle_response(response).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &[&str], query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self.send(self.inner.http.get(url).query(query)).await?;
        self.handle_response(response).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self.send(self.inner.http.post(url).json(body)).await?;
        self.handle_response(response).await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T, B>(&self, path: &[&str], body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self.send(self.inner.http.patch(url).json(body)).await?;
        self.handle_response(response).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &[&str]) -> Result<()> {
        let url = self.url(path)?;
        let response = self.send(self.inner.http.delete(url)).await?;

        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        Ok(())
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    ///
    /// 401 and 403 force a logout before the error is returned.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.json::<ErrorResponse>().await.unwrap_or_default();
        let message = if body.message.is_empty() {
            format!("HTTP {}", status)
        } else {
            body.message
        };

        match status {
            401 | 403 => {
                self.force_logout(status);
                Error::Auth { status, message }
            }
            404 => Error::NotFound(message),
            _ => Error::Api {
                status,
                code: body.code.unwrap_or_else(|| "unknown".to_string()),
                message,
            },
        }
    }

    fn force_logout(&self, status: u16) {
        warn!(status, "backend rejected credentials, logging out");
        self.logout();
        if let Some(handler) = &self.inner.on_unauthorized {
            handler.on_unauthorized(status);
        }
    }
}

/// Builder for creating a ScholarlyClient.
pub struct ClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    timeout: Duration,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            on_unauthorized: None,
        }
    }

    /// Set the base URL for the backend.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the bearer token issued by the identity provider.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Register the forced-logout hook.
    pub fn on_unauthorized(mut self, handler: impl UnauthorizedHandler + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ScholarlyClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("{} is not an http base URL", base_url)));
        }
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        if let Some(token) = &self.auth_token
            && HeaderValue::from_str(&format!("Bearer {}", token)).is_err()
        {
            return Err(Error::Config("Invalid auth token".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("scholarly-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ScholarlyClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                token: RwLock::new(self.auth_token),
                on_unauthorized: self.on_unauthorized,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
