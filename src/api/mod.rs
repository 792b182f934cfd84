//! Authenticated request execution for the HireHub REST API.
//!
//! This module provides the `ApiClient` used by every dashboard feature:
//! credential attachment, expiry-driven refresh, retry-once on 401, and
//! ordered probing of candidate endpoints where the exact server route is
//! not statically known.

pub mod client;
pub mod error;
pub mod outcome;
pub mod request;

pub use client::ApiClient;
pub use error::{ApiError, FailureKind};
pub use outcome::{Body, Outcome};
pub use request::{RequestBody, RequestOptions};
