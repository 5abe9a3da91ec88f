//! HTTP request dispatcher
//!
//! Two entry points:
//! - [`PanelClient::request`] talks to the panel backend, attaches the
//!   session token and inspects the `{code, msg, data}` envelope
//! - [`PanelClient::external`] talks to any other service with an optional
//!   caller-supplied bearer token
//!
//! Problems are surfaced as toasts through [`NoticeDispatcher`]. The toast
//! is an extra side effect: callers still receive the envelope or the error
//! exactly as the transport produced it.

pub mod classify;
mod endpoints;

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{ApiResponse, HttpMethod};
use crate::notify::Notifier;
use crate::session::Session;

pub use classify::{
    ApiIssue, Layer, NoticeDispatcher, classify_envelope, classify_external_status,
    classify_network, classify_status,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid header {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// HTTP status when the server answered with a non-2xx code
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Per-call options merged over the computed defaults
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Repeat `key` once per value (`ids=a&ids=b`)
    pub fn query_all<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.query
            .extend(values.into_iter().map(|v| (key.to_string(), v.to_string())));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Extra header, replacing a computed one with the same name
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }
}

/// Client for the panel API and third-party APIs
#[derive(Debug, Clone)]
pub struct PanelClient {
    client: Client,
    base_url: String,
    session: Session,
    dispatcher: NoticeDispatcher,
}

impl PanelClient {
    /// Create a client resolving internal paths against `base_url`
    pub fn new(base_url: &str, session: Session, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_client(Client::new(), base_url, session, notifier)
    }

    pub fn with_client(
        client: Client,
        base_url: &str,
        session: Session,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dispatcher: NoticeDispatcher::new(notifier, session.clone()),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Call the panel API
    ///
    /// Any 2xx response yields `Ok` with the envelope, even when the
    /// envelope carries an error code. Non-2xx statuses and network
    /// failures yield `Err` after the toast was queued.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = join_url(&self.base_url, path);
        let mut headers = HeaderMap::new();
        if let Some(token) = self.session.token() {
            headers.insert(AUTHORIZATION, bearer_value(&token)?);
        }

        debug!(?method, %url, "Panel API request");
        let resp = match self.send(method, &url, headers, None, options).await {
            Ok(resp) => resp,
            Err(ApiError::Network(e)) => {
                self.dispatcher.dispatch(&classify_network(&e, None));
                return Err(ApiError::Network(e));
            }
            Err(e) => return Err(e),
        };

        let status = resp.status().as_u16();
        if let Some(issue) = classify_status(status) {
            self.dispatcher.dispatch(&issue);
            return Err(ApiError::Status { status, url });
        }

        let body = read_body(resp).await?;
        if is_blank(&body) {
            debug!(%url, status, "Empty response body");
            return Ok(ApiResponse::empty());
        }
        let envelope: ApiResponse<T> = decode(&body)?;
        if let Some(issue) = classify_envelope(status, envelope.code, &envelope.msg) {
            self.dispatcher.dispatch(&issue);
        }
        Ok(envelope)
    }

    /// Call a third-party API at `base`
    ///
    /// `bearer` is sent as-is; the session token is never forwarded.
    pub async fn external<T: DeserializeOwned>(
        &self,
        base: &str,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        bearer: Option<&str>,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = join_url(base, path);
        let mut headers = HeaderMap::new();
        if let Some(token) = bearer.filter(|t| !t.is_empty()) {
            headers.insert(AUTHORIZATION, bearer_value(token)?);
        }

        debug!(?method, %url, "External API request");
        let resp = match self.send(method, &url, headers, body, options).await {
            Ok(resp) => resp,
            Err(ApiError::Network(e)) => {
                self.dispatcher.dispatch(&classify_network(&e, Some(base)));
                return Err(ApiError::Network(e));
            }
            Err(e) => return Err(e),
        };

        let status = resp.status().as_u16();
        if let Some(issue) = classify_external_status(status) {
            self.dispatcher.dispatch(&issue);
            return Err(ApiError::Status { status, url });
        }

        let body = read_body(resp).await?;
        if is_blank(&body) {
            return decode(b"null");
        }
        decode(&body)
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        mut headers: HeaderMap,
        body: Option<serde_json::Value>,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
            headers.insert(name, value);
        }

        let mut req = self.client.request(method.into(), url).headers(headers);
        if !options.query.is_empty() {
            req = req.query(&options.query);
        }
        if let Some(body) = options.body.or(body) {
            req = req.json(&body);
        }

        req.send().await.map_err(ApiError::Network)
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.trim_end_matches('/').to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn bearer_value(token: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ApiError::InvalidHeader(AUTHORIZATION.to_string()))
}

async fn read_body(resp: Response) -> Result<Vec<u8>, ApiError> {
    let bytes = resp.bytes().await.map_err(ApiError::Network)?;
    Ok(bytes.to_vec())
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
