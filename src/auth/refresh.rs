//! Single-flight exchange of the refresh credential for a new access
//! credential.
//!
//! The server's refresh route is not known exactly by the client, so one
//! attempt walks an ordered list of candidate endpoints. Concurrent callers
//! share one in-flight attempt: servers that invalidate a refresh credential
//! on first use would reject every attempt after the first, so N callers
//! racing through a 401 must spend the credential exactly once.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::session::SessionStore;

/// Accepted access-credential field names in refresh responses, in
/// preference order.
const ACCESS_FIELDS: &[&str] = &["access", "token", "access_token"];

/// Accepted refresh-credential field names, in preference order.
const REFRESH_FIELDS: &[&str] = &["refresh", "refresh_token"];

type InflightRefresh = Shared<BoxFuture<'static, Option<String>>>;

/// Coordinates credential refresh across concurrent callers.
/// Clone is cheap - the in-flight slot and store are shared via Arc.
#[derive(Clone)]
pub struct RefreshCoordinator {
    client: Client,
    store: Arc<SessionStore>,
    endpoints: Arc<Vec<String>>,
    inflight: Arc<Mutex<Option<InflightRefresh>>>,
}

impl RefreshCoordinator {
    pub fn new(client: Client, store: Arc<SessionStore>, endpoints: Vec<String>) -> Self {
        Self {
            client,
            store,
            endpoints: Arc::new(endpoints),
            inflight: Arc::new(Mutex::new(None)),
        }
    }

    /// Exchange the stored refresh credential for a new access credential.
    ///
    /// Returns `None` without any network call when no refresh credential
    /// is stored. If an attempt is already in flight the caller awaits that
    /// same attempt. When every candidate endpoint fails, the whole session
    /// is cleared and `None` is returned.
    pub async fn refresh(&self) -> Option<String> {
        self.store.load().refresh?;

        let attempt = {
            let mut inflight = self.inflight.lock().await;
            if let Some(attempt) = inflight.as_ref() {
                debug!("Refresh already in flight, attaching to it");
                attempt.clone()
            } else {
                let this = self.clone();
                let attempt: InflightRefresh = async move {
                    let result = this.run_attempt().await;
                    // Release the slot so a later call can start fresh
                    this.inflight.lock().await.take();
                    result
                }
                .boxed()
                .shared();
                *inflight = Some(attempt.clone());
                attempt
            }
        };
        attempt.await
    }

    async fn run_attempt(&self) -> Option<String> {
        // Re-read in case the credential changed while we were queued
        let refresh = self.store.load().refresh?;

        for url in self.endpoints.iter() {
            let response = match self
                .client
                .post(url)
                .header(header::ACCEPT, "application/json")
                .json(&serde_json::json!({ "refresh": refresh }))
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %url, error = %e, "Refresh candidate unreachable, trying next");
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED {
                debug!(url = %url, status = %status, "Refresh route not served here, trying next");
                continue;
            }

            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to read refresh response, trying next");
                    continue;
                }
            };

            if !status.is_success() {
                debug!(url = %url, status = %status, "Refresh rejected, trying next");
                continue;
            }

            // Some deployments serve JSON without declaring it; parse the
            // text regardless of content type.
            let Ok(body) = serde_json::from_str::<Value>(&text) else {
                debug!(url = %url, "Refresh response was not JSON, trying next");
                continue;
            };

            if let Some(new_access) = first_field(&body, ACCESS_FIELDS) {
                // Keep the existing refresh credential when the server
                // does not rotate it.
                let new_refresh = first_field(&body, REFRESH_FIELDS);
                if let Err(e) = self.store.save(Some(&new_access), new_refresh.as_deref()) {
                    warn!(error = %e, "Failed to persist refreshed credentials");
                }
                debug!(url = %url, "Refresh succeeded");
                return Some(new_access);
            }
        }

        warn!("Refresh failed on every candidate endpoint, clearing session");
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        None
    }
}

/// First string value among the given field names, in order.
fn first_field(body: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| body.get(*name).and_then(Value::as_str))
        .map(str::to_string)
}
