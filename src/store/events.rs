//! Event records: name plus optional date, the scoping entity for attendees.

use sqlx::SqlitePool;

use crate::models::event::{parse_display_date, Event, EventInput};
use crate::utils::error::AppError;

/// Events ordered by name ascending.
pub async fn list(pool: &SqlitePool) -> Result<Vec<Event>, AppError> {
    let events = sqlx::query_as::<_, Event>("SELECT id, name, event_date FROM events ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(events)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT id, name, event_date FROM events WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {id} not found")))
}

pub async fn create(pool: &SqlitePool, input: EventInput) -> Result<Event, AppError> {
    let (name, event_date) = validate(&input)?;

    sqlx::query_as::<_, Event>(
        "INSERT INTO events (name, event_date) VALUES (?, ?)
         RETURNING id, name, event_date",
    )
    .bind(name)
    .bind(event_date)
    .fetch_one(pool)
    .await
    .map_err(classify_write_error)
}

pub async fn update(pool: &SqlitePool, id: i64, input: EventInput) -> Result<Event, AppError> {
    let (name, event_date) = validate(&input)?;

    sqlx::query_as::<_, Event>(
        "UPDATE events SET name = ?, event_date = ? WHERE id = ?
         RETURNING id, name, event_date",
    )
    .bind(name)
    .bind(event_date)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(classify_write_error)?
    .ok_or_else(|| AppError::NotFound(format!("Event {id} not found")))
}

/// Removes the event; attendees go with it through the cascade. An unknown
/// id is NotFound, the same choice the attendee store makes.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Event {id} not found")));
    }
    Ok(())
}

fn validate(input: &EventInput) -> Result<(&str, Option<chrono::NaiveDate>), AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Event name is required".to_string()));
    }

    let event_date = input
        .event_date
        .as_deref()
        .map(str::trim)
        .filter(|date| !date.is_empty())
        .map(parse_display_date)
        .transpose()?;

    Ok((name, event_date))
}

fn classify_write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Duplicate("An event with this name already exists".to_string())
        }
        _ => AppError::Storage(err),
    }
}
