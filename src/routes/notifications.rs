use axum::{extract::State, response::IntoResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::Result,
    routes::extract::{Json, Path},
    AppState,
};

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notifications = state.notification_service.list_for_user(user_id).await?;
    Ok(Json(json!({ "success": true, "notifications": notifications })))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notification = state.notification_service.mark_read(id).await?;
    Ok(Json(json!({ "success": true, "notification": notification })))
}

#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let updated = state.notification_service.mark_all_read(user_id).await?;
    tracing::debug!(user_id = %user_id, updated, "notifications marked read");
    Ok(Json(json!({
        "success": true,
        "message": "All notifications marked as read",
    })))
}

#[axum::debug_handler]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.notification_service.delete(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Notification deleted",
    })))
}
