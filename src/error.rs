//! Error types for PocketRadar API calls.
//!
//! Transport failures, undecodable responses and client misuse all surface as
//! [`Error`]. A service-reported error flag in an otherwise successful
//! response is *not* an [`Error`]; check [`Response::has_error`] for that.
//!
//! [`Response::has_error`]: crate::Response::has_error

use http::{HeaderMap, StatusCode};

/// The main error type for PocketRadar API calls.
///
/// # Examples
///
/// ```no_run
/// use pocketradar::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder().access_token("token").build()?;
///
/// match client.tags().get_sports_tags().await {
///     Ok(response) => println!("Tags: {:?}", response.decoded_body()?),
///     Err(Error::HttpError { status, raw_response, .. }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection failed, DNS lookup failed,
    /// body could not be read, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be read as UTF-8 text.
    #[error("Response body is not valid UTF-8: {0}")]
    InvalidBody(#[from] std::string::FromUtf8Error),

    /// The server answered with a status code of 400 or above.
    ///
    /// The error message is the raw response body, so the service's own
    /// error payload is what gets displayed.
    #[error("{raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// A JSON response could not be decoded while validation was requested.
    #[error("Invalid response (status {status}): {serde_error}")]
    InvalidResponse {
        /// The raw response body that failed to decode
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// An endpoint group name that the client does not know.
    #[error("Undefined api instance called: \"{0}\"")]
    UnknownApi(String),

    /// A token had to be fetched but no credential was set on the client.
    #[error("No credential set; cannot fetch an access token")]
    MissingCredential,

    /// The login response did not carry a `token` field.
    #[error("Login response did not contain a token")]
    MissingToken,

    /// The service flagged the response as an error where the client needed
    /// it to succeed (e.g. a rejected login).
    #[error("Service reported an error: {raw_response}")]
    ServiceError {
        /// The raw response body
        raw_response: String,
    },

    /// A date parameter could not be understood.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A parameter value could not be serialized.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Invalid configuration was provided.
    ///
    /// This indicates a problem with how the client or request was
    /// configured, such as an unsupported API version or an invalid header.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if the error was raised by the transport layer.
    ///
    /// # Examples
    ///
    /// ```
    /// use pocketradar::Error;
    /// use http::{HeaderMap, StatusCode};
    ///
    /// let err = Error::HttpError {
    ///     status: StatusCode::NOT_FOUND,
    ///     raw_response: "not found".to_string(),
    ///     headers: HeaderMap::new(),
    /// };
    ///
    /// assert!(err.is_transport());
    /// assert_eq!(err.to_string(), "not found");
    /// assert!(!Error::MissingToken.is_transport());
    /// ```
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Timeout | Error::InvalidBody(_) | Error::HttpError { .. }
        )
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::InvalidResponse { status, .. } => Some(*status),
            Error::Network(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::InvalidResponse { raw_response, .. } => Some(raw_response),
            Error::ServiceError { raw_response } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for PocketRadar API calls.
pub type Result<T> = std::result::Result<T, Error>;
