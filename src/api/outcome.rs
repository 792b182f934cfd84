//! The normalized result every caller outside the client observes.

use serde_json::Value;

use super::error::FailureKind;

/// Normalized response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The response declared a JSON content type and parsed.
    Json(Value),
    /// Raw text: either a non-JSON content type, or JSON that failed
    /// to parse.
    Text(String),
    Empty,
}

/// Uniform result shape for one logical request.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub success: bool,
    pub status: u16,
    pub body: Body,
}

impl Outcome {
    pub(crate) fn new(status: u16, body: Body) -> Self {
        Self {
            success: (200..300).contains(&status),
            status,
            body,
        }
    }

    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        FailureKind::from_status(self.status)
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.failure_kind(), Some(FailureKind::Auth))
    }
}
