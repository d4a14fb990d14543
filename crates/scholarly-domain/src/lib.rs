//! Application lifecycle for the Scholarly portal.
//!
//! This crate sits between the HTTP client and the command line. It owns
//! the rules the backend leaves to its callers:
//!
//! - **Submission**: required-field validation, duplicate and deadline
//!   checks, and the zero-fee shortcut past the payment page
//! - **Payment handoff**: checkout sessions and return reconciliation
//! - **Moderation**: filtering and the status transition table
//! - **Tracking**: a student's rows with the actions each one allows
//! - **Roles**: background lookup with a student fallback
//!
//! # Example
//!
//! ```no_run
//! use scholarly_client::ScholarlyClient;
//! use scholarly_domain::{Identity, PortalServices, ServiceSettings};
//!
//! # async fn example() -> scholarly_domain::Result<()> {
//! let client = ScholarlyClient::builder()
//!     .base_url("http://localhost:5000")
//!     .auth_token("id-token")
//!     .build()?;
//! let services = PortalServices::new(client, ServiceSettings::default());
//!
//! let me = Identity::new("ada@example.com", "Ada");
//! for row in services.tracking().rows(&me).await? {
//!     println!("{} {}", row.application.id, row.application.application_status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
mod error;
pub mod identity;
pub mod lifecycle;
pub mod roles;
pub mod routes;
pub mod scope;
pub mod services;

pub use cache::QueryCache;
pub use error::{DomainError, GENERIC_FAILURE, Result, RuleViolation, SESSION_EXPIRED};
pub use identity::{Actor, Identity};
pub use lifecycle::RowActions;
pub use roles::{RoleResolver, RoleState, lookup_role};
pub use routes::Route;
pub use scope::ViewScope;
pub use services::analytics::{AnalyticsService, PortalSummary, summarize};
pub use services::catalog::{
    CatalogService, Page, ScholarshipDetail, ScholarshipQuery, SortKey, top_scholarships,
};
pub use services::moderation::{ApplicationFilter, ModerationService, NO_APPLICATIONS_MESSAGE};
pub use services::payment::{
    Checkout, CheckoutSettings, CostSummary, PaymentReceipt, PaymentService, ReturnQuery,
};
pub use services::submission::{SubmissionOutcome, SubmissionService, validate_details};
pub use services::tracking::{TrackingRow, TrackingService};
pub use services::users::UserAdminService;
pub use services::{PortalServices, ServiceSettings};
