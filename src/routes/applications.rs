use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::application_dto::{ApplyPayload, StatusPayload},
    error::Result,
    routes::extract::{Json, Path},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted successfully"),
        (status = 400, description = "Missing job or user"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.apply(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Application submitted successfully",
            "application": application,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_applications(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let applications = state.application_service.list().await?;
    Ok(Json(json!({ "success": true, "applications": applications })))
}

#[axum::debug_handler]
pub async fn list_user_applications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_by_user(user_id).await?;
    Ok(Json(json!({ "success": true, "applications": applications })))
}

#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_by_job(job_id).await?;
    Ok(Json(json!({ "success": true, "applications": applications })))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status recorded"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.update_status(id, payload).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Application {} successfully", application.status.as_str()),
        "application": application,
    })))
}
