use thiserror::Error;

/// Errors surfaced by the client.
///
/// HTTP-level failures are not errors - they come back inside an
/// [`Outcome`](super::Outcome). Only transport-level problems (DNS,
/// connection, timeout) and local misuse surface here.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid authorization header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("No candidate endpoints supplied")]
    NoEndpoints,
}

/// Coarse classification of a non-success outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 401/403 - a property of the caller's session, not the route.
    Auth,
    /// 404/405 - this candidate route does not exist; another may.
    Routing,
    /// Any other non-2xx status. Never retried automatically.
    Server,
}

impl FailureKind {
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 | 403 => Some(Self::Auth),
            404 | 405 => Some(Self::Routing),
            _ => Some(Self::Server),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_mapping() {
        assert_eq!(FailureKind::from_status(200), None);
        assert_eq!(FailureKind::from_status(204), None);
        assert_eq!(FailureKind::from_status(401), Some(FailureKind::Auth));
        assert_eq!(FailureKind::from_status(403), Some(FailureKind::Auth));
        assert_eq!(FailureKind::from_status(404), Some(FailureKind::Routing));
        assert_eq!(FailureKind::from_status(405), Some(FailureKind::Routing));
        assert_eq!(FailureKind::from_status(500), Some(FailureKind::Server));
        assert_eq!(FailureKind::from_status(422), Some(FailureKind::Server));
    }
}
