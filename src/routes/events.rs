use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::event_dto::{CreateEventPayload, DeleteEventPayload, UpdateEventPayload},
    error::Result,
    routes::extract::{Json, Path},
    AppState,
};

#[axum::debug_handler]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let events = state.event_service.list().await?;
    Ok(Json(json!({ "success": true, "events": events })))
}

#[axum::debug_handler]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let event = state.event_service.get(id).await?;
    Ok(Json(json!({ "success": true, "event": event })))
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let event = state.event_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Event created successfully",
            "event": event,
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let event = state.event_service.update(id, payload).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Event updated successfully",
        "event": event,
    })))
}

/// The body is optional; without one the caller is anonymous.
#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<DeleteEventPayload>>,
) -> Result<impl IntoResponse> {
    let user_id = payload.and_then(|Json(p)| p.user_id);
    state.event_service.delete(id, user_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Event deleted successfully",
    })))
}
