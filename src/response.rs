//! Response wrapper bound to the request that produced it.
//!
//! The [`Response`] keeps the raw status, headers and body and decodes the
//! body as JSON on first access. Service-level failures are reported through
//! [`Response::has_error`] rather than as an [`Error`](crate::Error).

use crate::params::is_truthy;
use crate::transport::RawResponse;
use crate::{Error, Request, Result};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cell::OnceCell;

const JSON_CONTENT_TYPE: &str = "application/json";

/// The outcome of decoding the body once.
#[derive(Debug, Clone)]
struct Decoded {
    value: Value,
    serde_error: Option<String>,
}

/// A response from the PocketRadar API.
///
/// # Examples
///
/// ```no_run
/// use pocketradar::Client;
///
/// # async fn example() -> Result<(), pocketradar::Error> {
/// let client = Client::builder().access_token("token").build()?;
/// let response = client.tags().get_activities_tags().await?;
///
/// if response.has_error()? {
///     eprintln!("Service error: {}", response.body());
/// } else {
///     println!("Activities: {}", response.decoded_body()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    request: Request,
    status: StatusCode,
    headers: HeaderMap,
    body: String,
    decoded: OnceCell<Decoded>,
}

impl Response {
    /// Binds a raw transport result to the request that produced it.
    pub fn new(request: Request, raw: RawResponse) -> Self {
        Self {
            request,
            status: raw.status,
            headers: raw.headers,
            body: raw.body,
            decoded: OnceCell::new(),
        }
    }

    /// The request that produced this response.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the first value of a header, if it is valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// The raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The access token the request was sent with.
    pub fn access_token(&self) -> Option<&str> {
        self.request.access_token()
    }

    /// Returns the body decoded as JSON.
    ///
    /// Only bodies served as `application/json` are decoded; anything else
    /// yields an empty object. The result is computed once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResponse`] if the request asked for validation
    /// and a non-empty JSON body could not be decoded.
    pub fn decoded_body(&self) -> Result<&Value> {
        let decoded = self.decoded.get_or_init(|| self.decode());

        match &decoded.serde_error {
            Some(serde_error) if self.request.validate_response() => Err(Error::InvalidResponse {
                raw_response: self.body.clone(),
                serde_error: serde_error.clone(),
                status: self.status,
            }),
            _ => Ok(&decoded.value),
        }
    }

    /// Returns the service's `error` flag, `false` when absent.
    ///
    /// # Errors
    ///
    /// Fails the same way as [`Response::decoded_body`].
    pub fn has_error(&self) -> Result<bool> {
        Ok(self
            .decoded_body()?
            .get("error")
            .is_some_and(is_truthy))
    }

    /// Deserializes the raw body into `T`, regardless of content type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResponse`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| Error::InvalidResponse {
            raw_response: self.body.clone(),
            serde_error: e.to_string(),
            status: self.status,
        })
    }

    /// Returns `true` if any `Content-Type` value has the given media type.
    ///
    /// Parameters after `;` are ignored.
    pub fn has_content_type(&self, media_type: &str) -> bool {
        self.headers
            .get_all(CONTENT_TYPE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .any(|value| value.trim().eq_ignore_ascii_case(media_type))
    }

    fn decode(&self) -> Decoded {
        let empty = || Value::Object(Map::new());

        if !self.has_content_type(JSON_CONTENT_TYPE) {
            return Decoded {
                value: empty(),
                serde_error: None,
            };
        }

        let trimmed = self.body.trim();
        if trimmed.is_empty() {
            return Decoded {
                value: empty(),
                serde_error: None,
            };
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Null) => Decoded {
                value: empty(),
                serde_error: None,
            },
            Ok(value) => Decoded {
                value,
                serde_error: None,
            },
            Err(e) => {
                if self.request.validate_response() {
                    tracing::error!(
                        error = %e,
                        raw_response = %self.body,
                        "Failed to decode response"
                    );
                } else {
                    tracing::debug!(error = %e, "Ignoring undecodable response body");
                }

                Decoded {
                    value: empty(),
                    serde_error: Some(e.to_string()),
                }
            }
        }
    }
}
