//! Schema evolution.
//!
//! The schema version lives in SQLite's `user_version` pragma. Migration
//! steps are ordered and run once each: every step executes inside its own
//! transaction and bumps the version on commit, so a failed step rolls back
//! and leaves the previous structure untouched. A store that is already at
//! the current version passes through without changes.

use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;

use crate::utils::error::AppError;

/// Version the store must reach before the server starts serving.
const SCHEMA_VERSION: i64 = 2;

/// Event that adopts attendees from a store predating the event model.
pub const DEFAULT_EVENT_ID: i64 = 1;
pub const DEFAULT_EVENT_NAME: &str = "Default Event";

const CREATE_EVENTS: &str = "CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    event_date TEXT DEFAULT NULL
)";

const CREATE_PEOPLE: &str = "CREATE TABLE IF NOT EXISTS people (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id INTEGER NOT NULL DEFAULT 1,
    name TEXT NOT NULL,
    email TEXT,
    time_of_day TEXT NOT NULL DEFAULT 'Morning',
    checked INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (event_id) REFERENCES events(id) ON DELETE CASCADE,
    UNIQUE (event_id, email)
)";

pub async fn run(pool: &SqlitePool) -> Result<(), AppError> {
    let mut current = current_version(pool).await?;

    while current < SCHEMA_VERSION {
        let next = current + 1;
        let mut tx = pool.begin().await?;

        match next {
            1 => baseline(&mut tx).await?,
            2 => attach_attendees_to_events(&mut tx).await?,
            _ => unreachable!("no migration step for version {next}"),
        }

        sqlx::query(&format!("PRAGMA user_version = {next}"))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(version = next, "applied schema migration");
        current = next;
    }

    Ok(())
}

async fn current_version(pool: &SqlitePool) -> Result<i64, AppError> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

/// v1: the current shape for fresh stores. A store carrying a pre-event
/// attendee table keeps it as-is here; v2 rebuilds it.
async fn baseline(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>) -> Result<(), AppError> {
    sqlx::query(CREATE_EVENTS).execute(&mut **tx).await?;
    sqlx::query(CREATE_PEOPLE).execute(&mut **tx).await?;

    sqlx::query("INSERT OR IGNORE INTO events (id, name) VALUES (?, ?)")
        .bind(DEFAULT_EVENT_ID)
        .bind(DEFAULT_EVENT_NAME)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// v2: non-destructive expansion of an attendee table that predates the
/// event relationship. Every row is preserved and attached to the default
/// event; legacy Dutch time-of-day labels are folded into the closed enum.
async fn attach_attendees_to_events(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
) -> Result<(), AppError> {
    if column_exists(&mut **tx, "people", "event_id").await? {
        return Ok(());
    }

    sqlx::query("ALTER TABLE people RENAME TO people_legacy")
        .execute(&mut **tx)
        .await?;
    sqlx::query(CREATE_PEOPLE).execute(&mut **tx).await?;

    sqlx::query(
        "INSERT INTO people (id, event_id, name, email, time_of_day, checked)
         SELECT id, ?, name, email,
                CASE lower(trim(timeOfDay))
                    WHEN 'ochtend' THEN 'Morning'
                    WHEN 'middag' THEN 'Afternoon'
                    WHEN 'hele dag' THEN 'Full-day'
                    WHEN 'morning' THEN 'Morning'
                    WHEN 'afternoon' THEN 'Afternoon'
                    WHEN 'full-day' THEN 'Full-day'
                    ELSE 'Morning'
                END,
                checked
         FROM people_legacy",
    )
    .bind(DEFAULT_EVENT_ID)
    .execute(&mut **tx)
    .await?;

    sqlx::query("DROP TABLE people_legacy")
        .execute(&mut **tx)
        .await?;

    Ok(())
}

async fn column_exists(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM pragma_table_info(?) WHERE name = ?")
        .bind(table)
        .bind(column)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::models::attendee::TimeOfDay;
    use crate::store::attendees;

    async fn legacy_store() -> SqlitePool {
        let pool = memory_pool().await;
        sqlx::query(
            "CREATE TABLE people (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT,
                checked INTEGER DEFAULT 0,
                timeOfDay TEXT DEFAULT 'Ochtend'
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn fresh_store_gets_current_schema_and_default_event() {
        let pool = memory_pool().await;
        run(&pool).await.unwrap();

        let version: i64 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        let name: String = sqlx::query_scalar("SELECT name FROM events WHERE id = ?")
            .bind(DEFAULT_EVENT_ID)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name, DEFAULT_EVENT_NAME);
    }

    #[tokio::test]
    async fn running_twice_is_a_no_op() {
        let pool = memory_pool().await;
        run(&pool).await.unwrap();
        run(&pool).await.unwrap();

        let events: i64 = sqlx::query_scalar("SELECT count(*) FROM events")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(events, 1);

        let version: i64 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn legacy_attendees_are_adopted_by_the_default_event() {
        let pool = legacy_store().await;
        sqlx::query(
            "INSERT INTO people (name, email, checked, timeOfDay) VALUES
                ('Alice', 'alice@example.com', 1, 'Ochtend'),
                ('Bob', NULL, 0, 'Hele dag')",
        )
        .execute(&pool)
        .await
        .unwrap();

        run(&pool).await.unwrap();

        let adopted = attendees::list(&pool, DEFAULT_EVENT_ID).await.unwrap();
        assert_eq!(adopted.len(), 2);

        let alice = &adopted[0];
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.email.as_deref(), Some("alice@example.com"));
        assert_eq!(alice.time_of_day, TimeOfDay::Morning);
        assert!(alice.checked);

        let bob = &adopted[1];
        assert_eq!(bob.email, None);
        assert_eq!(bob.time_of_day, TimeOfDay::FullDay);
        assert!(!bob.checked);
    }

    #[tokio::test]
    async fn failed_expansion_leaves_the_legacy_table_untouched() {
        let pool = legacy_store().await;
        // Two rows with the same email cannot satisfy the per-event unique
        // constraint, so the expansion step must fail.
        sqlx::query(
            "INSERT INTO people (name, email) VALUES
                ('Alice', 'same@example.com'),
                ('Alice again', 'same@example.com')",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert!(run(&pool).await.is_err());

        let has_event_id = {
            let mut conn = pool.acquire().await.unwrap();
            column_exists(&mut conn, "people", "event_id")
                .await
                .unwrap()
        };
        assert!(!has_event_id, "legacy table should keep its old shape");

        let rows: i64 = sqlx::query_scalar("SELECT count(*) FROM people")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 2);
    }
}
