use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::cv_dto::{CvStatusResponse, CvSubmission},
    error::Result,
    routes::{
        extract::{Json, Path},
        read_upload,
    },
    AppState,
};

#[axum::debug_handler]
pub async fn submit_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut submission = CvSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cvDocument" => {
                if let Some(file) = read_upload(field).await? {
                    submission.cv_document = Some(file);
                }
            }
            "certificateFiles" => {
                if let Some(file) = read_upload(field).await? {
                    submission.certificate_files.push(file);
                }
            }
            _ => {
                let value = field.text().await?;
                submission.set_text(&name, value);
            }
        }
    }

    let submitted = state.cv_service.submit(submission).await?;
    let message = if submitted.created {
        "CV submitted successfully"
    } else {
        "CV updated successfully"
    };
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": message,
            "cv": submitted.cv,
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_user_cv(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let body = match state.cv_service.get_by_user(user_id).await? {
        Some(cv) => json!({ "success": true, "data": cv }),
        None => json!({
            "success": true,
            "data": null,
            "message": "CV not found for this user",
        }),
    };
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn cv_status(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let has_cv = state.cv_service.has_cv(user_id).await?;
    Ok(Json(CvStatusResponse {
        success: true,
        has_cv,
        message: if has_cv { "CV submitted" } else { "CV not submitted" },
    }))
}

#[axum::debug_handler]
pub async fn delete_user_cv(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.cv_service.delete(user_id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "CV deleted successfully",
    })))
}
