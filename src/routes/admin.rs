//! Moderation endpoints. Every handler here sits behind `require_admin`, so
//! the acting admin comes from the session claims, never from the body.

use axum::{extract::State, response::IntoResponse, Extension};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::admin_dto::{BanPayload, ModerationPayload, RolePayload},
    error::Result,
    models::user::UserResponse,
    routes::extract::{Json, Path},
    utils::token::Claims,
    AppState,
};

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users: Vec<UserResponse> = state
        .admin_service
        .list_users()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(json!({ "success": true, "users": users })))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = UserResponse::from(state.admin_service.get_user(id).await?);
    Ok(Json(json!({ "success": true, "user": user })))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.admin_service.delete_user(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully",
    })))
}

#[axum::debug_handler]
pub async fn change_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RolePayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .admin_service
        .change_role(id, payload.role.as_deref())
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "User role updated successfully",
        "user": UserResponse::from(user),
    })))
}

#[axum::debug_handler]
pub async fn ban_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BanPayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .admin_service
        .set_ban(id, payload.banned, payload.reason.as_deref())
        .await?;
    let message = if user.banned {
        "User banned successfully"
    } else {
        "User unbanned successfully"
    };
    Ok(Json(json!({
        "success": true,
        "message": message,
        "user": UserResponse::from(user),
    })))
}

#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    payload: Option<Json<ModerationPayload>>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.unwrap_or_default();
    let (_, notification) = state
        .admin_service
        .delete_job(id, payload.reason.as_deref(), claims.sub)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Job deleted by admin successfully",
        "notification": notification,
    })))
}

#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    payload: Option<Json<ModerationPayload>>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.unwrap_or_default();
    state
        .admin_service
        .delete_event(id, payload.reason.as_deref(), claims.sub)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Event deleted by admin successfully",
    })))
}

#[axum::debug_handler]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let events = state.admin_service.list_events().await?;
    Ok(Json(json!({ "success": true, "events": events })))
}

#[axum::debug_handler]
pub async fn list_cvs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let cvs = state.admin_service.list_cvs().await?;
    Ok(Json(json!({ "success": true, "cvs": cvs })))
}
