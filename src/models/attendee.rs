use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Part of the day an attendee is registered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    #[serde(rename = "Full-day")]
    #[sqlx(rename = "Full-day")]
    FullDay,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::FullDay => "Full-day",
        }
    }

    /// Lenient reading used on the import path; unknown labels fall back to
    /// the Morning default.
    pub fn parse_lenient(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "afternoon" => TimeOfDay::Afternoon,
            "full-day" | "full day" => TimeOfDay::FullDay,
            _ => TimeOfDay::Morning,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub time_of_day: TimeOfDay,
    pub checked: bool,
}

/// Body of the attendee create/update endpoints. On the create route a
/// present `id` turns the call into an in-place update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeInput {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    #[serde(default)]
    pub checked: bool,
    pub event_id: i64,
}

/// One row of a bulk import, either parsed from CSV text or posted as JSON.
/// The time-of-day arrives as free text and is normalized on insert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub time_of_day: String,
    #[serde(default)]
    pub checked: bool,
}
