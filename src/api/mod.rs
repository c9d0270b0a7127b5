//! Endpoint groups of the PocketRadar API.
//!
//! Each group is a thin typed wrapper over [`Client::send`](crate::Client::send)
//! with fixed endpoints and verbs. Groups are resolved by name through
//! [`ApiName`] or obtained directly from the client accessors.

mod history;
mod login;
mod tags;

pub use history::{DateInput, History, HistoryQuery, DATE_FORMAT};
pub use login::Login;
pub use tags::Tags;

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Names of the known endpoint groups.
///
/// # Examples
///
/// ```
/// use pocketradar::api::ApiName;
///
/// assert_eq!("history".parse::<ApiName>().unwrap(), ApiName::History);
/// assert!("users".parse::<ApiName>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiName {
    Login,
    History,
    Tags,
}

impl ApiName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiName::Login => "login",
            ApiName::History => "history",
            ApiName::Tags => "tags",
        }
    }
}

impl FromStr for ApiName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "login" => Ok(ApiName::Login),
            "history" => Ok(ApiName::History),
            "tags" => Ok(ApiName::Tags),
            other => Err(Error::UnknownApi(other.to_string())),
        }
    }
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An endpoint group bound to a client.
pub enum Api<'a> {
    Login(Login<'a>),
    History(History<'a>),
    Tags(Tags<'a>),
}

impl Api<'_> {
    pub fn name(&self) -> ApiName {
        match self {
            Api::Login(_) => ApiName::Login,
            Api::History(_) => ApiName::History,
            Api::Tags(_) => ApiName::Tags,
        }
    }
}
