use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{
    dto::auth_dto::{LoginPayload, RegisterPayload},
    error::Result,
    routes::extract::Json,
    AppState,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let session = state.auth_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "user": session.user,
            "token": session.token,
        })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    let session = state.auth_service.login(payload).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "user": session.user,
        "token": session.token,
    })))
}
