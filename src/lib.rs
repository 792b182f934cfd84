//! HireHub API client core.
//!
//! Resilient, session-aware HTTP client used by the HireHub recruiting
//! dashboards: credential persistence across runs, proactive and reactive
//! token refresh with single-flight de-duplication, and ordered endpoint
//! probing for deployments whose exact routes differ.
//!
//! The usual entry point is [`ApiClient`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use hirehub_client::{ApiClient, ApiConfig, RequestOptions, SessionStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = Arc::new(SessionStore::open(SessionStore::default_dir()?)?);
//! let api = ApiClient::new(ApiConfig::new("https://hirehub.example.com"), store)?;
//!
//! let outcome = api
//!     .execute("https://hirehub.example.com/api/jobs/", RequestOptions::get())
//!     .await?;
//! if outcome.success {
//!     println!("{:?}", outcome.json());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError, Body, FailureKind, Outcome, RequestBody, RequestOptions};
pub use auth::{AuthScheme, RefreshCoordinator, Session, SessionStore, TokenStatus};
pub use config::ApiConfig;
