use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::attendee::{Attendee, AttendeeInput, ImportRow};
use crate::state::AppState;
use crate::store::attendees::{self, ImportSummary, Saved};
use crate::utils::error::AppError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub event_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub people: Vec<ImportRow>,
    pub event_id: i64,
}

pub async fn list_attendees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Attendee>>, AppError> {
    let attendees = attendees::list(&state.pool, query.event_id).await?;
    Ok(Json(attendees))
}

/// Insert-or-update: a body carrying an `id` updates that record in place.
pub async fn save_attendee(
    State(state): State<AppState>,
    Json(input): Json<AttendeeInput>,
) -> Result<Json<Value>, AppError> {
    match attendees::save(&state.pool, input).await? {
        Saved::Inserted(id) => Ok(Json(json!({ "insertedId": id }))),
        Saved::Updated(id) => Ok(Json(json!({ "updatedId": id }))),
    }
}

pub async fn update_attendee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AttendeeInput>,
) -> Result<Json<Value>, AppError> {
    attendees::update(&state.pool, id, input).await?;
    Ok(Json(json!({ "updatedId": id })))
}

pub async fn delete_attendee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    attendees::delete(&state.pool, id).await?;
    Ok(Json(json!({ "deletedId": id })))
}

pub async fn toggle_attendee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Attendee>, AppError> {
    let attendee = attendees::toggle_checked(&state.pool, id).await?;
    Ok(Json(attendee))
}

pub async fn import_attendees(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportSummary>, AppError> {
    let summary = attendees::bulk_insert(&state.pool, request.event_id, &request.people).await?;
    Ok(Json(summary))
}
