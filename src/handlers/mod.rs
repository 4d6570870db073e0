use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub mod attendees;
pub mod events;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "checklist-api",
    };

    Json(payload).into_response()
}
