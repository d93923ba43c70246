use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::JobPayload,
    error::Result,
    routes::extract::{Json, Path},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "All job postings, newest first")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list().await?;
    Ok(Json(json!({
        "success": true,
        "message": "Jobs fetched successfully",
        "jobs": jobs,
    })))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(json!({ "success": true, "job": job })))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = JobPayload,
    responses(
        (status = 201, description = "Job created successfully"),
        (status = 400, description = "Missing or invalid fields")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Job created successfully",
            "job": job,
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/jobs/recruiter/{recruiter_id}",
    params(
        ("recruiter_id" = Uuid, Path, description = "Recruiter user ID")
    ),
    responses(
        (status = 200, description = "Postings owned by the recruiter")
    )
)]
#[axum::debug_handler]
pub async fn list_recruiter_jobs(
    State(state): State<AppState>,
    Path(recruiter_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_by_recruiter(recruiter_id).await?;
    Ok(Json(json!({ "success": true, "jobs": jobs })))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = JobPayload,
    responses(
        (status = 200, description = "Job updated successfully"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(id, payload).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Job updated successfully",
        "job": job,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted successfully"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Job deleted successfully",
    })))
}
