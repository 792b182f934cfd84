//! Authentication module: session persistence, credential inspection,
//! and single-flight refresh.
//!
//! This module provides:
//! - `SessionStore`: file-persisted access/refresh credential pair
//! - `token`: local expiry classification and the header scheme
//! - `RefreshCoordinator`: candidate-endpoint refresh shared across
//!   concurrent callers

pub mod refresh;
pub mod session;
pub mod token;

pub use refresh::RefreshCoordinator;
pub use session::{Session, SessionStore};
pub use token::{authorization_value, classify, AuthScheme, TokenStatus};
