//! Access-credential inspection: local expiry classification and the
//! `Authorization` header scheme.
//!
//! JWT-shaped credentials (three dot-separated segments) carry a decodable
//! `exp` claim, so expiry can be evaluated without a network call. Opaque
//! credentials cannot be evaluated locally; the server's 401 is the oracle
//! for those.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Safety margin before literal expiry during which a credential is
/// treated as expiring and refreshed proactively.
pub const DEFAULT_EXPIRY_BUFFER_SECS: i64 = 30;

/// Result of classifying a stored access credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// No credential is stored.
    Missing,
    /// The credential's `exp` has passed, or its payload is undecodable.
    Expired,
    /// Expiry falls within the buffer window.
    ExpiringSoon,
    /// Usable as-is. Opaque credentials always classify here.
    Valid,
}

/// Scheme used for the `Authorization` header.
///
/// The platform accepts credentials from two issuers: a JWT issuer
/// (`Bearer`) and an opaque-token issuer (`Token`). `Auto` picks by
/// credential shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Auto,
    Bearer,
    Token,
}

/// Classify an access credential against the expiry buffer.
pub fn classify(token: Option<&str>, buffer_secs: i64) -> TokenStatus {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return TokenStatus::Missing;
    };
    if !looks_like_jwt(token) {
        return TokenStatus::Valid;
    }
    // Undecodable payload or missing exp: fail toward refreshing rather
    // than sending a doomed request.
    let Some(exp) = decoded_expiry(token) else {
        return TokenStatus::Expired;
    };
    let now = Utc::now().timestamp();
    if exp <= now {
        TokenStatus::Expired
    } else if exp <= now + buffer_secs {
        TokenStatus::ExpiringSoon
    } else {
        TokenStatus::Valid
    }
}

/// Build the `Authorization` header value for a credential.
pub fn authorization_value(token: &str, scheme: AuthScheme) -> String {
    let bearer = match scheme {
        AuthScheme::Bearer => true,
        AuthScheme::Token => false,
        AuthScheme::Auto => looks_like_jwt(token),
    };
    if bearer {
        format!("Bearer {}", token)
    } else {
        format!("Token {}", token)
    }
}

pub(crate) fn looks_like_jwt(token: &str) -> bool {
    token.split('.').count() == 3
}

fn decoded_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    // Real JWTs are unpadded base64url; strip any padding a lenient
    // issuer added before decoding.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_exp(exp: i64) -> String {
        let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{}}}", exp));
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", payload)
    }

    #[test]
    fn test_classify_missing() {
        assert_eq!(classify(None, 30), TokenStatus::Missing);
        assert_eq!(classify(Some(""), 30), TokenStatus::Missing);
        assert_eq!(classify(Some("   "), 30), TokenStatus::Missing);
    }

    #[test]
    fn test_classify_opaque_is_valid() {
        // No self-described expiry; the server 401 signals expiry instead.
        assert_eq!(classify(Some("opaquetoken123"), 30), TokenStatus::Valid);
    }

    #[test]
    fn test_classify_expired() {
        let token = jwt_with_exp(Utc::now().timestamp() - 100);
        assert_eq!(classify(Some(&token), 30), TokenStatus::Expired);
    }

    #[test]
    fn test_classify_expiring_soon() {
        let token = jwt_with_exp(Utc::now().timestamp() + 100);
        assert_eq!(classify(Some(&token), 300), TokenStatus::ExpiringSoon);
    }

    #[test]
    fn test_classify_valid() {
        let token = jwt_with_exp(Utc::now().timestamp() + 3600);
        assert_eq!(classify(Some(&token), 30), TokenStatus::Valid);
    }

    #[test]
    fn test_classify_malformed_jwt_is_expired() {
        // Three segments but garbage payload
        assert_eq!(classify(Some("abc.!!notbase64!!.ghi"), 30), TokenStatus::Expired);
        // Decodable payload without an exp claim
        let payload = URL_SAFE_NO_PAD.encode("{\"sub\":\"42\"}");
        let token = format!("abc.{}.ghi", payload);
        assert_eq!(classify(Some(&token), 30), TokenStatus::Expired);
    }

    #[test]
    fn test_classify_accepts_padded_payload() {
        let padded = format!(
            "abc.{}=.ghi",
            URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{}}}", Utc::now().timestamp() + 3600))
        );
        // Padding alone must not force a refresh
        assert_ne!(classify(Some(&padded), 30), TokenStatus::Missing);
    }

    #[test]
    fn test_authorization_scheme_by_shape() {
        assert_eq!(
            authorization_value("abc.def.ghi", AuthScheme::Auto),
            "Bearer abc.def.ghi"
        );
        assert_eq!(
            authorization_value("opaquetoken123", AuthScheme::Auto),
            "Token opaquetoken123"
        );
    }

    #[test]
    fn test_authorization_scheme_override() {
        assert_eq!(
            authorization_value("opaquetoken123", AuthScheme::Bearer),
            "Bearer opaquetoken123"
        );
        assert_eq!(
            authorization_value("abc.def.ghi", AuthScheme::Token),
            "Token abc.def.ghi"
        );
    }
}
