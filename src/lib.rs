//! # PocketRadar - client SDK for the PocketRadar API
//!
//! Authenticates against the service, builds requests, dispatches them
//! through a pluggable [`Transport`](transport::Transport) and decodes the
//! responses.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pocketradar::{api::HistoryQuery, Client, Credential};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pocketradar::Error> {
//!     let mut client = Client::builder().build()?;
//!
//!     // Logs in with POST session and keeps the returned token
//!     client
//!         .set_credential(Credential::new("coach@example.com", "secret"), true)
//!         .await?;
//!
//!     let response = client
//!         .history()
//!         .get_histories(HistoryQuery::new().date_start("2024-01-01"))
//!         .await?;
//!
//!     if response.has_error()? {
//!         eprintln!("Service error: {}", response.body());
//!     } else {
//!         println!("Histories: {}", response.decoded_body()?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Three kinds of failure are kept apart:
//!
//! - transport failures ([`Error::Network`], [`Error::Timeout`],
//!   [`Error::HttpError`] for statuses of 400 and above, whose message is the
//!   raw response body),
//! - undecodable JSON where validation was requested
//!   ([`Error::InvalidResponse`]),
//! - the service's own `error` flag, which is not an [`Error`] and must be
//!   checked with [`Response::has_error`].
//!
//! ```no_run
//! use pocketradar::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().access_token("token").build()?;
//! match client.tags().get_sports_tags().await {
//!     Ok(response) if response.has_error()? => {
//!         eprintln!("Service error: {}", response.body());
//!     }
//!     Ok(response) => println!("Sports: {}", response.decoded_body()?),
//!     Err(Error::HttpError { status, raw_response, .. }) => {
//!         eprintln!("HTTP error {}: {}", status, raw_response);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Requests and responses are logged through `tracing`; install any
//! subscriber to see them. Tokens and passwords are never logged.

pub mod api;
mod client;
mod credential;
mod error;
pub mod params;
mod request;
mod response;
pub mod transport;

pub use client::{Client, ClientBuilder, PreparedRequest, API_VERSIONS, AUTH_HEADER, BASE_PATH, V1};
pub use credential::Credential;
pub use error::{Error, Result};
pub use request::{Request, DEFAULT_ACCEPT, DEFAULT_CONTENT_TYPE, VALIDATE_RESPONSE_PARAM};
pub use response::Response;
