//! Per-request options accepted by the executor and the prober.

use reqwest::Method;
use serde_json::Value;

/// Body encodings understood by the executor.
#[derive(Debug, Clone)]
pub enum RequestBody {
    None,
    /// Serialized as JSON with a matching `Content-Type`.
    Json(Value),
    /// Form-encoded key/value pairs.
    Form(Vec<(String, String)>),
    /// Passed through untouched, e.g. multipart payloads carrying their
    /// own boundary in the content type.
    Raw {
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// Options for a single logical request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Extra headers; a caller-supplied `Accept` overrides the default.
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    /// Skip credential attachment, for public/login endpoints.
    pub skip_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: RequestBody::None,
            skip_auth: false,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn post_json(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: RequestBody::Json(body),
            ..Self::default()
        }
    }

    pub fn post_form(pairs: Vec<(String, String)>) -> Self {
        Self {
            method: Method::POST,
            body: RequestBody::Form(pairs),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn without_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}
