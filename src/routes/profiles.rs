use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::profile_dto::{ApplicantProfilePayload, RecruiterProfilePayload},
    error::{Error, Result},
    routes::{
        extract::{Json, Path},
        read_upload,
    },
    services::upload_service::UploadedFile,
    AppState,
};

const PICTURE_FIELD: &str = "profilePicture";

async fn picture_from(mut multipart: Multipart) -> Result<UploadedFile> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(PICTURE_FIELD) {
            if let Some(file) = read_upload(field).await? {
                return Ok(file);
            }
        }
    }
    Err(Error::BadRequest("No file uploaded".to_string()))
}

#[axum::debug_handler]
pub async fn get_applicant(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applicant = state.profile_service.get_applicant(user_id).await?;
    Ok(Json(json!({ "success": true, "applicant": applicant })))
}

#[axum::debug_handler]
pub async fn update_applicant(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ApplicantProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let applicant = state
        .profile_service
        .upsert_applicant(user_id, payload.into())
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "applicant": applicant,
    })))
}

#[axum::debug_handler]
pub async fn upload_applicant_picture(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let file = picture_from(multipart).await?;
    let applicant = state
        .profile_service
        .set_applicant_picture(user_id, &file)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile picture uploaded successfully",
        "profilePicture": applicant.profile_picture,
        "applicant": applicant,
    })))
}

#[axum::debug_handler]
pub async fn remove_applicant_picture(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applicant = state.profile_service.remove_applicant_picture(user_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile picture removed",
        "applicant": applicant,
    })))
}

#[axum::debug_handler]
pub async fn get_recruiter(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let recruiter = state.profile_service.get_recruiter(user_id).await?;
    Ok(Json(json!({ "success": true, "recruiter": recruiter })))
}

#[axum::debug_handler]
pub async fn update_recruiter(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<RecruiterProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let recruiter = state
        .profile_service
        .upsert_recruiter(user_id, payload.into())
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "recruiter": recruiter,
    })))
}

#[axum::debug_handler]
pub async fn upload_recruiter_picture(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let file = picture_from(multipart).await?;
    let recruiter = state
        .profile_service
        .set_recruiter_picture(user_id, &file)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile picture uploaded successfully",
        "profilePicture": recruiter.profile_picture,
        "recruiter": recruiter,
    })))
}

#[axum::debug_handler]
pub async fn remove_recruiter_picture(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let recruiter = state.profile_service.remove_recruiter_picture(user_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile picture removed",
        "recruiter": recruiter,
    })))
}
