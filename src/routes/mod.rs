use axum::http::{header, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::{attendees, events, health_check};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route(
            "/api/events/:id",
            put(events::update_event).delete(events::delete_event),
        )
        .route("/api/events/:id/export", get(events::export_attendees))
        .route("/api/events/:id/import", post(events::import_attendees_csv))
        .route(
            "/api/people",
            get(attendees::list_attendees).post(attendees::save_attendee),
        )
        .route("/api/people/import", post(attendees::import_attendees))
        .route(
            "/api/people/:id",
            put(attendees::update_attendee).delete(attendees::delete_attendee),
        )
        .route("/api/people/:id/toggle", post(attendees::toggle_attendee))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
