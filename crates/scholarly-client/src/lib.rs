//! HTTP client SDK for the Scholarly portal backend.
//!
//! This crate provides a typed client for the portal's REST API. Every
//! request carries the identity provider's bearer token; a 401 or 403 from
//! the backend discards the token and fires the registered
//! [`UnauthorizedHandler`].
//!
//! # Example
//!
//! ```no_run
//! use scholarly_client::{Result, ScholarlyClient};
//!
//! # async fn example() -> Result<()> {
//! let client = ScholarlyClient::builder()
//!     .base_url("http://localhost:5000")
//!     .auth_token("id-token")
//!     .on_unauthorized(|status: u16| eprintln!("session expired ({status})"))
//!     .build()?;
//!
//! let mine = client.applications().list_for("ada@example.com").await?;
//! println!("{} applications", mine.len());
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Users**: list, role lookup, role changes, delete
//! - **Scholarships**: CRUD
//! - **Applications**: CRUD plus status, feedback, payment and review flags
//! - **Reviews**: CRUD, per reviewer and per scholarship
//! - **Payments**: checkout session creation
//! - **Dashboard**: server-side status counts

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, ScholarlyClient, UnauthorizedHandler};
pub use error::{Error, Result};
pub use types::*;
