use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::AppError;

/// Pattern dates are accepted and presented in. Internally dates are kept as
/// `NaiveDate` (canonical `yyyy-mm-dd` in the store); `dd-mm-yyyy` exists
/// only at the boundary.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub event_date: Option<NaiveDate>,
}

/// Wire shape of an event; the date goes out in `dd-mm-yyyy`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    pub event_date: Option<String>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            event_date: event.event_date.map(format_display_date),
        }
    }
}

/// Body of the create and update endpoints, date in `dd-mm-yyyy`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub name: String,
    #[serde(default)]
    pub event_date: Option<String>,
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Strict `dd-mm-yyyy` parse: the value must be zero-padded, so formatting
/// the parsed date must reproduce the input exactly.
pub fn parse_display_date(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input, DISPLAY_DATE_FORMAT)
        .ok()
        .filter(|date| format_display_date(*date) == input)
        .ok_or_else(|| {
            AppError::Validation(format!("Invalid date '{input}', expected dd-mm-yyyy"))
        })
}
