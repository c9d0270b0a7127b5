//! PocketRadar API client.
//!
//! The [`Client`] owns the transport, the base path and the current
//! credentials. It turns logical calls into prepared HTTP requests, hands
//! them to the [`Transport`] and wraps the results into [`Response`]s.
//! Use [`ClientBuilder`] to configure and create clients.

use crate::{
    api::{Api, ApiName, History, Login, Tags},
    params::Params,
    request::merge_headers,
    transport::{RequestOptions, ReqwestTransport, Transport},
    Credential, Error, Request, Response, Result,
};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// PocketRadar API root URL.
pub const BASE_PATH: &str = "https://app.pocketradar.com/api";

/// API version 1.
pub const V1: &str = "v1";

/// Supported API versions.
pub const API_VERSIONS: &[&str] = &[V1];

/// Header carrying the access token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// A client for the PocketRadar API.
///
/// Cloning is cheap; clones share the transport but keep their own
/// credentials. Methods that change the token take `&mut self`.
///
/// # Examples
///
/// ```no_run
/// use pocketradar::{Client, Credential};
///
/// # async fn example() -> Result<(), pocketradar::Error> {
/// let mut client = Client::builder().build()?;
/// client
///     .set_credential(Credential::new("coach@example.com", "secret"), true)
///     .await?;
///
/// let response = client.tags().get_sports_tags().await?;
/// if !response.has_error()? {
///     println!("Sports: {}", response.decoded_body()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    base_path: String,
    api_version: String,
    default_headers: HeaderMap,
    access_token: Option<String>,
    credential: Option<Credential>,
}

/// A request ready for the transport.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// The full endpoint URL.
    pub url: Url,
    /// All outgoing headers.
    pub headers: HeaderMap,
    /// The form body, if any.
    pub body: Option<String>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client with default settings and the `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Resolves an endpoint group by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownApi`] for names other than `login`,
    /// `history` and `tags`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pocketradar::{api::Api, Client, Error};
    ///
    /// let client = Client::new().unwrap();
    /// assert!(matches!(client.api("tags"), Ok(Api::Tags(_))));
    /// assert!(matches!(client.api("users"), Err(Error::UnknownApi(_))));
    /// ```
    pub fn api(&self, name: &str) -> Result<Api<'_>> {
        let api = match name.parse::<ApiName>()? {
            ApiName::Login => Api::Login(self.login()),
            ApiName::History => Api::History(self.history()),
            ApiName::Tags => Api::Tags(self.tags()),
        };
        Ok(api)
    }

    /// Returns the login endpoint group.
    pub fn login(&self) -> Login<'_> {
        Login::new(self)
    }

    /// Returns the measurement history endpoint group.
    pub fn history(&self) -> History<'_> {
        History::new(self)
    }

    /// Returns the sports and activities tags endpoint group.
    pub fn tags(&self) -> Tags<'_> {
        Tags::new(self)
    }

    /// Returns the stored credential, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Stores the credential and applies its access token.
    ///
    /// When the credential has no token and `fetch_token` is set, a login
    /// call is made right away to obtain one.
    pub async fn set_credential(&mut self, credential: Credential, fetch_token: bool) -> Result<()> {
        let token = credential.access_token().map(str::to_string);
        self.credential = Some(credential);
        self.set_access_token(token, fetch_token).await
    }

    /// Returns the current access token without logging in.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Sets the access token.
    ///
    /// With no token and `fetch_token` set, logs in with the stored
    /// credential, sending the current token along. The current token is
    /// only replaced once the login succeeds. Otherwise the token is stored
    /// as given, which clears it for `None`.
    pub async fn set_access_token(&mut self, token: Option<String>, fetch_token: bool) -> Result<()> {
        let token = token.filter(|t| !t.is_empty());

        self.access_token = match token {
            None if fetch_token => Some(self.fetch_token().await?),
            token => token,
        };

        Ok(())
    }

    /// Returns the current access token, logging in first if there is none.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredential`] if a login is needed but no credential
    ///   is set.
    /// - [`Error::ServiceError`] if the service flags the login as failed.
    /// - [`Error::MissingToken`] if the login response has no `token`.
    /// - Any transport or validation error from the login call.
    pub async fn ensure_token(&mut self) -> Result<&str> {
        if self.access_token.is_none() {
            let token = self.fetch_token().await?;
            self.access_token = Some(token);
        }

        match &self.access_token {
            Some(token) => Ok(token.as_str()),
            None => Err(Error::MissingToken),
        }
    }

    async fn fetch_token(&self) -> Result<String> {
        let credential = self.credential.as_ref().ok_or(Error::MissingCredential)?;

        let response = self
            .login()
            .session(credential.login(), credential.password())
            .await?;

        if response.has_error()? {
            tracing::warn!(login = %credential.login(), "Login rejected by service");
            return Err(Error::ServiceError {
                raw_response: response.body().to_string(),
            });
        }

        let token = response
            .decoded_body()?
            .get("token")
            .and_then(Value::as_str)
            .ok_or(Error::MissingToken)?;

        tracing::info!(login = %credential.login(), "Fetched access token");
        Ok(token.to_string())
    }

    /// Returns the transport requests are sent through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Replaces the transport used for every later request.
    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.transport = Arc::new(transport);
    }

    /// Returns the API version segment, e.g. `v1`.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns the versioned API root, e.g. `https://app.pocketradar.com/api/v1`.
    pub fn base_path(&self) -> String {
        format!("{}/{}", self.base_path, self.api_version)
    }

    /// Makes a request to the API.
    ///
    /// `access_token` takes precedence over the client's current token.
    /// `headers` are merged last and win over the generated ones.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pocketradar::{params::Params, transport::RequestOptions, Client};
    /// use http::{HeaderMap, HeaderValue, Method};
    ///
    /// # async fn example() -> Result<(), pocketradar::Error> {
    /// let client = Client::builder().access_token("token").build()?;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("accept", HeaderValue::from_static("text/plain"));
    ///
    /// let response = client
    ///     .send(
    ///         Method::GET,
    ///         "users/settings/sports",
    ///         Params::new(),
    ///         RequestOptions::new(),
    ///         headers,
    ///         None,
    ///     )
    ///     .await?;
    /// println!("{}", response.body());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: Params,
        options: RequestOptions,
        headers: HeaderMap,
        access_token: Option<&str>,
    ) -> Result<Response> {
        let access_token = access_token
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or_else(|| self.access_token.clone());

        let request = Request::new(method, endpoint)
            .with_headers(self.default_headers.clone())
            .with_access_token(access_token)
            .with_params(params)
            .with_headers(headers);

        self.send_request(request, &options).await
    }

    /// Shorthand for [`Client::send`] without extra headers or token.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        params: Params,
        options: RequestOptions,
    ) -> Result<Response> {
        self.send(method, endpoint, params, options, HeaderMap::new(), None)
            .await
    }

    /// Sends a prepared [`Request`] and wraps the result.
    pub async fn send_request(&self, mut request: Request, options: &RequestOptions) -> Result<Response> {
        if let Some(validate) = options.validate_response {
            request.set_validate_response(validate);
        }

        let prepared = self.prepare_request(&mut request)?;
        let method = request.method().clone();

        tracing::debug!(
            method = %method,
            url = %prepared.url,
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let result = self
            .transport
            .send(
                &prepared.url,
                method.clone(),
                prepared.body,
                prepared.headers,
                options,
            )
            .await;

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %method,
                    endpoint = %request.endpoint(),
                    "Request failed"
                );
                return Err(e);
            }
        };

        tracing::info!(
            status = raw.status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            "Received HTTP response"
        );

        Ok(Response::new(request, raw))
    }

    /// Builds the URL, headers and body for a request.
    ///
    /// Bodiless requests get an empty content type so no `Content-Type`
    /// header is sent. Headers are layered as auth, content type, accept,
    /// then the request's own headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or a header value is invalid.
    pub fn prepare_request(&self, request: &mut Request) -> Result<PreparedRequest> {
        let url = self.build_url(request.endpoint())?;

        let body = request.body();
        if body.is_none() {
            request.set_content_type("");
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = request.access_token() {
            headers.insert(HeaderName::from_static(AUTH_HEADER), header_value(token)?);
        }
        if !request.content_type().is_empty() {
            headers.insert(CONTENT_TYPE, header_value(request.content_type())?);
        }
        if !request.accept().is_empty() {
            headers.insert(ACCEPT, header_value(request.accept())?);
        }
        merge_headers(&mut headers, request.headers());

        Ok(PreparedRequest { url, headers, body })
    }

    fn build_url(&self, endpoint: &str) -> Result<Url> {
        let url = format!("{}/{}", self.base_path(), endpoint.trim_start_matches('/'));
        Ok(Url::parse(&url)?)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use pocketradar::{ClientBuilder, Credential};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), pocketradar::Error> {
/// let client = ClientBuilder::new()
///     .api_version("v1")?
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")?
///     .credential(Credential::new("coach@example.com", "secret").with_access_token("T123"))
///     .build()?;
///
/// assert_eq!(client.access_token(), Some("T123"));
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_path: String,
    api_version: String,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
    credential: Option<Credential>,
    access_token: Option<String>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_path: BASE_PATH.to_string(),
            api_version: V1.to_string(),
            default_headers: HeaderMap::new(),
            timeout: None,
            transport: None,
            credential: None,
            access_token: None,
        }
    }

    /// Sets the API root (without version).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_path(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        self.base_path = url.as_str().trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Sets the API version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is not in [`API_VERSIONS`].
    pub fn api_version(mut self, version: impl AsRef<str>) -> Result<Self> {
        let version = version.as_ref();
        if !API_VERSIONS.contains(&version) {
            return Err(Error::ConfigurationError(format!(
                "Unsupported API version: {}",
                version
            )));
        }
        self.api_version = version.to_string();
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = header_value(value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the request timeout of the default transport.
    ///
    /// Ignored when a custom transport is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uses a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets the credential.
    ///
    /// Its access token, if any, becomes the client's token unless one is
    /// set explicitly. No login happens here; call
    /// [`Client::ensure_token`] to fetch a token.
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Sets the access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let http_client = reqwest::Client::builder().build().map_err(|e| {
                    Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
                })?;
                let mut transport = ReqwestTransport::with_client(http_client);
                if let Some(timeout) = self.timeout {
                    transport = transport.with_timeout(timeout);
                }
                Arc::new(transport)
            }
        };

        let access_token = self.access_token.or_else(|| {
            self.credential
                .as_ref()
                .and_then(|c| c.access_token())
                .map(str::to_string)
        });

        Ok(Client {
            transport,
            base_path: self.base_path,
            api_version: self.api_version,
            default_headers: self.default_headers,
            access_token,
            credential: self.credential,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
