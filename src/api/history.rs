use crate::{params::Params, transport::RequestOptions, Client, Error, Response, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use http::Method;

/// Format of every date sent to the history endpoint.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Text layouts accepted for dates, tried in order after RFC 3339.
const TEXT_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A date-like history filter value.
///
/// # Examples
///
/// ```
/// use pocketradar::api::DateInput;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(DateInput::from(date).format().unwrap(), "2024-03-09");
/// assert_eq!(DateInput::from("2024-03-09T17:30:00Z").format().unwrap(), "2024-03-09");
/// assert!(DateInput::from("last tuesday").format().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl DateInput {
    /// Resolves the input to a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] for text in none of the known layouts.
    pub fn to_date(&self) -> Result<NaiveDate> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::DateTime(datetime) => Ok(datetime.date()),
            DateInput::Text(text) => parse_date(text),
        }
    }

    /// Formats the input as `YYYY-MM-DD`.
    pub fn format(&self) -> Result<String> {
        Ok(self.to_date()?.format(DATE_FORMAT).to_string())
    }

    /// Returns `true` for text that is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(self, DateInput::Text(text) if text.trim().is_empty())
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Ok(datetime.date_naive());
    }
    for format in TEXT_DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(datetime.date());
        }
    }
    for format in TEXT_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }

    Err(Error::InvalidDate(text.to_string()))
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(datetime: NaiveDateTime) -> Self {
        DateInput::DateTime(datetime)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    /// Keeps the date as seen in the value's own time zone.
    fn from(datetime: DateTime<Tz>) -> Self {
        DateInput::DateTime(datetime.naive_local())
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

/// Filters for [`History::get_histories`]; every field is optional.
///
/// # Examples
///
/// ```
/// use pocketradar::api::HistoryQuery;
///
/// let query = HistoryQuery::new()
///     .date_start("2024-01-01")
///     .updated_at("2024-02-15 08:00:00");
///
/// assert_eq!(
///     query.to_query().unwrap(),
///     vec![
///         ("dateStart".to_string(), "2024-01-01".to_string()),
///         ("updatedAt".to_string(), "2024-02-15".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub date_start: Option<DateInput>,
    pub date_end: Option<DateInput>,
    pub updated_at: Option<DateInput>,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_start(mut self, date: impl Into<DateInput>) -> Self {
        self.date_start = Some(date.into());
        self
    }

    pub fn date_end(mut self, date: impl Into<DateInput>) -> Self {
        self.date_end = Some(date.into());
        self
    }

    pub fn updated_at(mut self, date: impl Into<DateInput>) -> Self {
        self.updated_at = Some(date.into());
        self
    }

    /// Returns the query string pairs for the filters that are set.
    ///
    /// Blank text filters count as unset.
    pub fn to_query(&self) -> Result<Vec<(String, String)>> {
        [
            ("dateStart", &self.date_start),
            ("dateEnd", &self.date_end),
            ("updatedAt", &self.updated_at),
        ]
        .into_iter()
        .filter_map(|(key, date)| date.as_ref().map(|date| (key, date)))
        .filter(|(_, date)| !date.is_blank())
        .map(|(key, date)| date.format().map(|value| (key.to_string(), value)))
        .collect()
    }
}

/// Measurement history of the current user.
pub struct History<'a> {
    client: &'a Client,
}

impl<'a> History<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists history entries matching the filters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] before any request is made if a text
    /// filter cannot be parsed.
    pub async fn get_histories(&self, query: HistoryQuery) -> Result<Response> {
        let options = RequestOptions::new().with_query_params(query.to_query()?);

        self.client
            .dispatch(Method::GET, "histories", Params::new(), options)
            .await
    }
}
