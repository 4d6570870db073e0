use sqlx::SqlitePool;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}
