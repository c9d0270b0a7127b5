//! A single outbound API call.

use crate::params::{ParamValue, Params};
use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Default content type for request bodies.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Default `Accept` header value.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Reserved parameter key that toggles response validation.
///
/// It is stripped from the parameters and never sent.
pub const VALIDATE_RESPONSE_PARAM: &str = "validateResponse";

/// One outbound call: method, endpoint, credentials, parameters and headers.
///
/// # Examples
///
/// ```
/// use pocketradar::{params::Params, Request};
/// use http::Method;
///
/// let request = Request::new(Method::PATCH, "users/settings/sports")
///     .with_params(Params::new().with("customSports", vec!["tennis"]))
///     .with_header("Accept", "text/plain")
///     .unwrap();
///
/// assert_eq!(
///     request.body().as_deref(),
///     Some("customSports=%5B%22tennis%22%5D")
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    endpoint: String,
    access_token: Option<String>,
    params: Params,
    headers: HeaderMap,
    content_type: String,
    accept: String,
    validate_response: bool,
}

impl Request {
    /// Creates a request with no parameters and default content negotiation.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            access_token: None,
            params: Params::new(),
            headers: HeaderMap::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            validate_response: true,
        }
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.set_params(params);
        self
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.set_headers(headers);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Sets whether the response must decode as JSON.
    ///
    /// Turn this off for endpoints that return nothing.
    pub fn with_validate_response(mut self, validate: bool) -> Self {
        self.validate_response = validate;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Stores the parameters.
    ///
    /// A non-null [`VALIDATE_RESPONSE_PARAM`] entry is removed and its
    /// truthiness becomes the request's validation flag. A null entry is
    /// left in place and the flag is unchanged.
    pub fn set_params(&mut self, mut params: Params) {
        let flag = params
            .get(VALIDATE_RESPONSE_PARAM)
            .filter(|value| !matches!(value, ParamValue::Null))
            .map(ParamValue::is_truthy);
        if let Some(flag) = flag {
            params.remove(VALIDATE_RESPONSE_PARAM);
            self.validate_response = flag;
        }
        self.params = params;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Merges headers into the request; the last value for a name wins.
    pub fn set_headers(&mut self, headers: HeaderMap) {
        merge_headers(&mut self.headers, &headers);
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }

    pub fn set_accept(&mut self, accept: impl Into<String>) {
        self.accept = accept.into();
    }

    pub fn validate_response(&self) -> bool {
        self.validate_response
    }

    pub fn set_validate_response(&mut self, validate: bool) {
        self.validate_response = validate;
    }

    /// Returns `true` if the method can carry a request body.
    pub fn method_allows_body(&self) -> bool {
        !matches!(
            self.method,
            Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
        )
    }

    /// Returns the form-urlencoded body, or `None` if there is nothing to send.
    ///
    /// Scalars are sent as text; lists and mappings are JSON-encoded under
    /// their key. The encoding does not depend on the declared content type.
    pub fn body(&self) -> Option<String> {
        if self.params.is_empty() || !self.method_allows_body() {
            return None;
        }
        Some(self.params.to_form_body())
    }

    /// Returns a parameter value.
    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }
}

/// Merges `source` into `target`; every name in `source` replaces all of
/// its values in `target`.
pub(crate) fn merge_headers(target: &mut HeaderMap, source: &HeaderMap) {
    for name in source.keys() {
        target.remove(name);
        for value in source.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}
