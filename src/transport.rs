//! The HTTP transport seam.
//!
//! [`Transport`] is the one capability the rest of the crate needs from an
//! HTTP library: send a fully prepared request and hand back a
//! [`RawResponse`]. [`ReqwestTransport`] is the default implementation.

use crate::{Error, Result};
use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// Per-call options handed to the transport alongside the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Query string pairs appended to the URL, in order.
    pub query: Vec<(String, String)>,

    /// Timeout for this call, overriding any transport default.
    pub timeout: Option<Duration>,

    /// Overrides the request's response validation flag when set.
    pub validate_response: Option<bool>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query string pair.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends multiple query string pairs.
    pub fn with_query_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.query.extend(params);
        self
    }

    /// Sets the timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets whether the response must be valid JSON.
    pub fn with_validate_response(mut self, validate: bool) -> Self {
        self.validate_response = Some(validate);
        self
    }
}

/// An HTTP result as returned by a [`Transport`].
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The response headers; a name may carry several values.
    pub headers: HeaderMap,
    /// The response body as text.
    pub body: String,
    /// The HTTP status code.
    pub status: StatusCode,
}

impl RawResponse {
    /// Creates a new `RawResponse`.
    pub fn new(headers: HeaderMap, body: impl Into<String>, status: StatusCode) -> Self {
        Self {
            headers,
            body: body.into(),
            status,
        }
    }

    /// Turns a status of 400 or above into [`Error::HttpError`].
    ///
    /// The error carries the raw body as its message, so the service's error
    /// payload is what the caller sees.
    ///
    /// # Examples
    ///
    /// ```
    /// use pocketradar::transport::RawResponse;
    /// use http::{HeaderMap, StatusCode};
    ///
    /// let raw = RawResponse::new(HeaderMap::new(), "not found", StatusCode::NOT_FOUND);
    /// let err = raw.error_for_status().unwrap_err();
    /// assert_eq!(err.to_string(), "not found");
    /// ```
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.as_u16() < 400 {
            return Ok(self);
        }

        if self.status.is_client_error() {
            tracing::warn!(
                status = self.status.as_u16(),
                response = %self.body,
                "Client error (4xx)"
            );
        } else {
            tracing::error!(
                status = self.status.as_u16(),
                response = %self.body,
                "Server error (5xx)"
            );
        }

        Err(Error::HttpError {
            status: self.status,
            raw_response: self.body,
            headers: self.headers,
        })
    }
}

/// Sends prepared requests to the PocketRadar API.
///
/// Implement this to plug in another HTTP library or a test double.
/// Implementations must fail with a transport error
/// ([`Error::Network`], [`Error::Timeout`] or [`Error::HttpError`]) when the
/// connection cannot be made, when the status is 400 or above, or when the
/// body cannot be read as text. [`RawResponse::error_for_status`] applies
/// the status rule.
///
/// # Examples
///
/// ```
/// use pocketradar::transport::{RawResponse, RequestOptions, Transport};
/// use http::{HeaderMap, Method, StatusCode};
/// use url::Url;
///
/// struct Offline;
///
/// #[async_trait::async_trait]
/// impl Transport for Offline {
///     async fn send(
///         &self,
///         _url: &Url,
///         _method: Method,
///         _body: Option<String>,
///         _headers: HeaderMap,
///         _options: &RequestOptions,
///     ) -> pocketradar::Result<RawResponse> {
///         RawResponse::new(HeaderMap::new(), "{}", StatusCode::OK).error_for_status()
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the raw result.
    async fn send(
        &self,
        url: &Url,
        method: Method,
        body: Option<String>,
        headers: HeaderMap,
        options: &RequestOptions,
    ) -> Result<RawResponse>;
}

/// A [`Transport`] backed by [`reqwest`].
///
/// Connection pooling, TLS and redirects are left to the wrapped
/// `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Creates a transport with a default `reqwest::Client`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing `reqwest::Client`.
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            timeout: None,
        }
    }

    /// Sets the default timeout applied when a call has none of its own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        url: &Url,
        method: Method,
        body: Option<String>,
        headers: HeaderMap,
        options: &RequestOptions,
    ) -> Result<RawResponse> {
        let mut url = url.clone();
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.query);
        }

        let mut request = self.http_client.request(method, url).headers(headers);

        if let Some(timeout) = options.timeout.or(self.timeout) {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|e| {
            tracing::error!(status = %status, "Response body is not valid UTF-8");
            Error::InvalidBody(e)
        })?;

        RawResponse::new(headers, body, status).error_for_status()
    }
}

fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(e)
    }
}
