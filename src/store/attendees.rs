//! Attendee records scoped to an event.
//!
//! Within one event an email may appear on at most one attendee; attendees
//! without an email are never deduplicated against each other.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::attendee::{Attendee, AttendeeInput, ImportRow, TimeOfDay};
use crate::utils::error::AppError;

const ATTENDEE_COLUMNS: &str = "id, event_id, name, email, time_of_day, checked";

/// Outcome of the insert-or-update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Inserted(i64),
    Updated(i64),
}

/// Counts returned by a bulk import, so callers can see partial success
/// instead of guessing from a bare acknowledgment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: u64,
    pub skipped: u64,
}

/// Attendees of one event, in stable id order. `checked` comes back as a
/// real boolean.
pub async fn list(pool: &SqlitePool, event_id: i64) -> Result<Vec<Attendee>, AppError> {
    let attendees = sqlx::query_as::<_, Attendee>(&format!(
        "SELECT {ATTENDEE_COLUMNS} FROM people WHERE event_id = ? ORDER BY id"
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(attendees)
}

/// Insert-or-update: without an id a new attendee is created, with one the
/// existing record is replaced in place.
pub async fn save(pool: &SqlitePool, input: AttendeeInput) -> Result<Saved, AppError> {
    match input.id {
        Some(id) => {
            update(pool, id, input).await?;
            Ok(Saved::Updated(id))
        }
        None => {
            let (name, email) = validate(&input)?;
            let result = sqlx::query(
                "INSERT INTO people (event_id, name, email, time_of_day, checked)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(input.event_id)
            .bind(name)
            .bind(email)
            .bind(input.time_of_day)
            .bind(input.checked)
            .execute(pool)
            .await
            .map_err(classify_write_error)?;

            Ok(Saved::Inserted(result.last_insert_rowid()))
        }
    }
}

/// Full replacement of the mutable fields; a changed `event_id` re-parents
/// the attendee.
pub async fn update(pool: &SqlitePool, id: i64, input: AttendeeInput) -> Result<Attendee, AppError> {
    let (name, email) = validate(&input)?;

    sqlx::query_as::<_, Attendee>(&format!(
        "UPDATE people SET name = ?, email = ?, time_of_day = ?, checked = ?, event_id = ?
         WHERE id = ?
         RETURNING {ATTENDEE_COLUMNS}"
    ))
    .bind(name)
    .bind(email)
    .bind(input.time_of_day)
    .bind(input.checked)
    .bind(input.event_id)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(classify_write_error)?
    .ok_or_else(|| AppError::NotFound(format!("Attendee {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM people WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Attendee {id} not found")));
    }
    Ok(())
}

/// Flip the attendance flag in a single conditional update, so two
/// concurrent toggles cannot read the same stale value.
pub async fn toggle_checked(pool: &SqlitePool, id: i64) -> Result<Attendee, AppError> {
    sqlx::query_as::<_, Attendee>(&format!(
        "UPDATE people SET checked = NOT checked WHERE id = ?
         RETURNING {ATTENDEE_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Attendee {id} not found")))
}

/// One insert per row, no cross-row atomicity. Rows with neither name nor
/// email are skipped; rows whose email is already taken within the event are
/// dropped without error and counted as skipped.
pub async fn bulk_insert(
    pool: &SqlitePool,
    event_id: i64,
    rows: &[ImportRow],
) -> Result<ImportSummary, AppError> {
    let mut summary = ImportSummary::default();

    for row in rows {
        let name = row.name.trim();
        let email = row
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty());

        if name.is_empty() && email.is_none() {
            summary.skipped += 1;
            continue;
        }

        let time_of_day = TimeOfDay::parse_lenient(&row.time_of_day);
        let result = sqlx::query(
            "INSERT OR IGNORE INTO people (event_id, name, email, time_of_day, checked)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(event_id)
        .bind(name)
        .bind(email)
        .bind(time_of_day)
        .bind(row.checked)
        .execute(pool)
        .await
        .map_err(classify_write_error)?;

        if result.rows_affected() == 0 {
            summary.skipped += 1;
        } else {
            summary.inserted += 1;
        }
    }

    Ok(summary)
}

fn validate(input: &AttendeeInput) -> Result<(&str, Option<&str>), AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty());

    Ok((name, email))
}

fn classify_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::Duplicate(
                "This email address is already registered for the event".to_string(),
            );
        }
        if db.is_foreign_key_violation() {
            return AppError::Validation("Unknown event".to_string());
        }
    }
    AppError::Storage(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::DEFAULT_EVENT_ID;
    use crate::db::test_pool;

    fn attendee(name: &str, email: Option<&str>) -> AttendeeInput {
        AttendeeInput {
            id: None,
            name: name.to_string(),
            email: email.map(str::to_string),
            time_of_day: TimeOfDay::Morning,
            checked: false,
            event_id: DEFAULT_EVENT_ID,
        }
    }

    fn row(name: &str, email: &str, time_of_day: &str, checked: bool) -> ImportRow {
        ImportRow {
            name: name.to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
            time_of_day: time_of_day.to_string(),
            checked,
        }
    }

    #[tokio::test]
    async fn save_inserts_without_id_and_updates_with_one() {
        let pool = test_pool().await;

        let saved = save(&pool, attendee("Alice", Some("alice@example.com")))
            .await
            .unwrap();
        let Saved::Inserted(id) = saved else {
            panic!("expected an insert, got {saved:?}");
        };

        let mut edit = attendee("Alice B.", Some("alice@example.com"));
        edit.id = Some(id);
        edit.checked = true;
        assert_eq!(save(&pool, edit).await.unwrap(), Saved::Updated(id));

        let listed = list(&pool, DEFAULT_EVENT_ID).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Alice B.");
        assert!(listed[0].checked);
    }

    #[tokio::test]
    async fn save_with_unknown_id_is_not_found() {
        let pool = test_pool().await;
        let mut input = attendee("Ghost", None);
        input.id = Some(4242);

        let err = save(&pool, input).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_email_within_the_event_is_rejected() {
        let pool = test_pool().await;
        save(&pool, attendee("Alice", Some("taken@example.com")))
            .await
            .unwrap();

        let err = save(&pool, attendee("Imposter", Some("taken@example.com")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn the_same_email_may_appear_in_different_events() {
        let pool = test_pool().await;
        let other = crate::store::events::create(
            &pool,
            crate::models::event::EventInput {
                name: "Other".to_string(),
                event_date: None,
            },
        )
        .await
        .unwrap();

        save(&pool, attendee("Alice", Some("alice@example.com")))
            .await
            .unwrap();

        let mut elsewhere = attendee("Alice", Some("alice@example.com"));
        elsewhere.event_id = other.id;
        save(&pool, elsewhere).await.unwrap();
    }

    #[tokio::test]
    async fn empty_name_and_unknown_event_are_validation_errors() {
        let pool = test_pool().await;

        let err = save(&pool, attendee("   ", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut orphan = attendee("Alice", None);
        orphan.event_id = 9999;
        let err = save(&pool, orphan).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_original_flag() {
        let pool = test_pool().await;
        let Saved::Inserted(id) = save(&pool, attendee("Alice", None)).await.unwrap() else {
            panic!("expected an insert");
        };

        let once = toggle_checked(&pool, id).await.unwrap();
        assert!(once.checked);

        let twice = toggle_checked(&pool, id).await.unwrap();
        assert!(!twice.checked);

        let err = toggle_checked(&pool, 9999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_signals_not_found_for_unknown_ids() {
        let pool = test_pool().await;
        let Saved::Inserted(id) = save(&pool, attendee("Alice", None)).await.unwrap() else {
            panic!("expected an insert");
        };

        delete(&pool, id).await.unwrap();
        let err = delete(&pool, id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn bulk_insert_applies_the_skip_policy() {
        let pool = test_pool().await;
        save(&pool, attendee("Existing", Some("taken@example.com")))
            .await
            .unwrap();

        let rows = vec![
            row("", "", "Morning", false),                    // both empty: skipped
            row("Alice", "a@example.com", "Morning", true),   // inserted
            row("Imposter", "taken@example.com", "Morning", false), // email taken: skipped
            row("Bob", "", "Afternoon", false),               // no email: always inserted
            row("Bob", "", "Afternoon", false),               // email-less rows never deduplicate
        ];

        let summary = bulk_insert(&pool, DEFAULT_EVENT_ID, &rows).await.unwrap();
        assert_eq!(summary, ImportSummary { inserted: 3, skipped: 2 });

        let listed = list(&pool, DEFAULT_EVENT_ID).await.unwrap();
        assert_eq!(listed.len(), 4);

        // The conflicting row must not have touched the existing record.
        let existing = listed
            .iter()
            .find(|a| a.email.as_deref() == Some("taken@example.com"))
            .unwrap();
        assert_eq!(existing.name, "Existing");
    }

    #[tokio::test]
    async fn bulk_insert_normalizes_time_of_day_labels() {
        let pool = test_pool().await;
        let rows = vec![
            row("Alice", "", "full day", true),
            row("Bob", "", "no idea", false),
        ];

        bulk_insert(&pool, DEFAULT_EVENT_ID, &rows).await.unwrap();

        let listed = list(&pool, DEFAULT_EVENT_ID).await.unwrap();
        assert_eq!(listed[0].time_of_day, TimeOfDay::FullDay);
        assert_eq!(listed[1].time_of_day, TimeOfDay::Morning);
    }
}
