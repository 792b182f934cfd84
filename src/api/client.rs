//! Authenticated request execution and endpoint probing.
//!
//! `execute` runs one logical request: attach the credential header,
//! refresh proactively when the access credential is about to expire,
//! retry exactly once after a 401, and normalize the response. `probe`
//! walks an ordered list of candidate URLs through `execute` for callers
//! that do not know the exact server route.

use std::sync::Arc;

use reqwest::{header, Client, StatusCode};
use tracing::{debug, warn};

use crate::auth::refresh::RefreshCoordinator;
use crate::auth::session::{Session, SessionStore};
use crate::auth::token::{authorization_value, classify, TokenStatus};
use crate::config::ApiConfig;

use super::error::ApiError;
use super::outcome::{Body, Outcome};
use super::request::{RequestBody, RequestOptions};

/// Session-aware API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    store: Arc<SessionStore>,
    refresher: RefreshCoordinator,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig, store: Arc<SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        let refresher = RefreshCoordinator::new(
            client.clone(),
            store.clone(),
            config.refresh_endpoints.clone(),
        );
        Ok(Self {
            client,
            store,
            refresher,
            config,
        })
    }

    /// Store credentials for subsequent requests (after login or an
    /// out-of-band refresh).
    pub fn save_session(&self, access: Option<&str>, refresh: Option<&str>) -> anyhow::Result<()> {
        self.store.save(access, refresh)
    }

    /// Erase the stored session (logout).
    pub fn clear_session(&self) -> anyhow::Result<()> {
        self.store.clear()
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.store.load()
    }

    /// Execute one logical request and normalize the response.
    ///
    /// HTTP failures come back as an [`Outcome`]; only transport errors
    /// surface as `Err`. May refresh the session as a side effect, and
    /// clears it when a 401 survives the retry protocol.
    pub async fn execute(&self, url: &str, options: RequestOptions) -> Result<Outcome, ApiError> {
        let outcome = self.execute_inner(url, &options).await?;
        if outcome.status == StatusCode::UNAUTHORIZED.as_u16() && !options.skip_auth {
            // A 401 that survived the retry protocol means the session is
            // dead; callers observe the 401 and must re-authenticate.
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear session");
            }
        }
        Ok(outcome)
    }

    async fn execute_inner(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<Outcome, ApiError> {
        let mut token = None;
        if !options.skip_auth {
            let session = self.store.load();
            token = session.access.clone();
            match classify(token.as_deref(), self.config.expiry_buffer_secs) {
                TokenStatus::Expired | TokenStatus::ExpiringSoon if session.refresh.is_some() => {
                    debug!(url, "Access credential expiring, refreshing before request");
                    // On failed recovery send without a credential and let
                    // the server issue the canonical 401.
                    token = self.refresher.refresh().await;
                }
                _ => {}
            }
        }

        let response = self.send(url, options, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !options.skip_auth {
            debug!(url, "Request returned 401, attempting refresh");
            if let Some(new_token) = self.refresher.refresh().await {
                // Exactly one retry; a server that always 401s must not loop
                let retry = self.send(url, options, Some(&new_token)).await?;
                return normalize(retry).await;
            }
            debug!(url, "Refresh failed, returning the original 401");
        }

        normalize(response).await
    }

    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.client.request(options.method.clone(), url);

        if let Some(token) = token {
            let value = authorization_value(token, self.config.auth_scheme);
            request = request.header(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&value)?,
            );
        }

        let caller_accept = options
            .headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("accept"));
        if !caller_accept {
            request = request.header(header::ACCEPT, "application/json");
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        request = match &options.body {
            RequestBody::None => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Form(pairs) => request.form(pairs),
            RequestBody::Raw {
                content_type,
                bytes,
            } => request
                .header(header::CONTENT_TYPE, content_type.as_str())
                .body(bytes.clone()),
        };

        Ok(request.send().await?)
    }

    /// Try each candidate URL in order, returning the first success.
    ///
    /// An authorization failure aborts the whole probe - it is a property
    /// of the caller's session, and further candidates cannot help. Every
    /// other failure advances to the next candidate; on exhaustion the
    /// last recorded failure is returned.
    pub async fn probe(
        &self,
        urls: &[String],
        options: RequestOptions,
    ) -> Result<Outcome, ApiError> {
        let mut last: Option<Result<Outcome, ApiError>> = None;

        for url in urls {
            match self.execute(url, options.clone()).await {
                Ok(outcome) if outcome.success => {
                    debug!(url = %url, "Probe candidate succeeded");
                    return Ok(outcome);
                }
                Ok(outcome) if outcome.is_auth_failure() => {
                    debug!(url = %url, status = outcome.status, "Probe aborted on auth failure");
                    return Ok(outcome);
                }
                Ok(outcome) => {
                    debug!(url = %url, status = outcome.status, "Probe candidate failed, trying next");
                    last = Some(Ok(outcome));
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Probe candidate unreachable, trying next");
                    last = Some(Err(e));
                }
            }
        }

        last.unwrap_or(Err(ApiError::NoEndpoints))
    }
}

/// Wrap a response as an [`Outcome`], parsing the body as JSON when the
/// content type declares it and degrading to raw text when parsing fails.
async fn normalize(response: reqwest::Response) -> Result<Outcome, ApiError> {
    let status = response.status().as_u16();
    let declares_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    let text = response.text().await?;
    let body = if text.is_empty() {
        Body::Empty
    } else if declares_json {
        match serde_json::from_str(&text) {
            Ok(value) => Body::Json(value),
            Err(e) => {
                warn!(status, error = %e, "Declared JSON body failed to parse, keeping raw text");
                Body::Text(text)
            }
        }
    } else {
        Body::Text(text)
    };

    Ok(Outcome::new(status, body))
}
