use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::csv;
use crate::models::event::{EventInput, EventResponse};
use crate::state::AppState;
use crate::store::attendees::ImportSummary;
use crate::store::{attendees, events};
use crate::utils::error::AppError;

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = events::list(&state.pool).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> Result<Json<EventResponse>, AppError> {
    let event = events::create(&state.pool, input).await?;
    Ok(Json(event.into()))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<EventInput>,
) -> Result<Json<EventResponse>, AppError> {
    let event = events::update(&state.pool, id, input).await?;
    Ok(Json(event.into()))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    events::delete(&state.pool, id).await?;
    Ok(Json(json!({ "deletedId": id })))
}

/// CSV download of the event's attendee list.
pub async fn export_attendees(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let event = events::get(&state.pool, id).await?;
    let attendees = attendees::list(&state.pool, id).await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", csv::export_file_name(&event)),
        ),
    ];

    Ok((headers, csv::export(&attendees)).into_response())
}

/// CSV upload: the raw request body is parsed as a semicolon-separated list
/// and fed to the bulk-insert path.
pub async fn import_attendees_csv(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: String,
) -> Result<Json<ImportSummary>, AppError> {
    events::get(&state.pool, id).await?;

    let rows = csv::parse_import(&body);
    let summary = attendees::bulk_insert(&state.pool, id, &rows).await?;
    Ok(Json(summary))
}
