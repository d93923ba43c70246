use axum::{
    extract::{multipart::Field, DefaultBodyLimit},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::Result;
use crate::middleware::{auth::require_admin, cors::api_cors};
use crate::services::upload_service::{UploadedFile, PUBLIC_PREFIX};
use crate::AppState;

pub mod admin;
pub mod applications;
pub mod auth;
pub mod cv;
pub mod events;
pub mod extract;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod profiles;

const BODY_LIMIT: usize = 60 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let auth_api = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let jobs_api = Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/:id",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route("/recruiter/:recruiter_id", get(jobs::list_recruiter_jobs));

    let applications_api = Router::new()
        .route(
            "/",
            get(applications::list_applications).post(applications::apply),
        )
        .route("/user/:user_id", get(applications::list_user_applications))
        .route("/job/:job_id", get(applications::list_job_applications))
        .route("/:id/status", put(applications::update_status));

    let notifications_api = Router::new()
        // GET takes a user id, DELETE a notification id
        .route(
            "/:id",
            get(notifications::list_notifications).delete(notifications::delete_notification),
        )
        .route("/:id/read", put(notifications::mark_read))
        .route("/user/:user_id/read-all", put(notifications::mark_all_read));

    let events_api = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        );

    let admin_api = Router::new()
        .route("/users", get(admin::list_users))
        .route(
            "/users/:id",
            get(admin::get_user).delete(admin::delete_user),
        )
        .route("/users/:id/role", put(admin::change_role))
        .route("/users/:id/ban", put(admin::ban_user))
        .route("/jobs/:id", delete(admin::delete_job))
        .route("/events", get(admin::list_events))
        .route("/events/:id", delete(admin::delete_event))
        .route("/cvs", get(admin::list_cvs))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let cv_api = Router::new()
        .route("/submit", post(cv::submit_cv))
        .route("/user/:user_id", get(cv::get_user_cv).delete(cv::delete_user_cv))
        .route("/status/:user_id", get(cv::cv_status));

    let applicants_api = Router::new()
        .route(
            "/:user_id",
            get(profiles::get_applicant).put(profiles::update_applicant),
        )
        .route(
            "/:user_id/profile-picture",
            post(profiles::upload_applicant_picture).delete(profiles::remove_applicant_picture),
        );

    let recruiters_api = Router::new()
        .route(
            "/:user_id",
            get(profiles::get_recruiter).put(profiles::update_recruiter),
        )
        .route(
            "/:user_id/profile-picture",
            post(profiles::upload_recruiter_picture).delete(profiles::remove_recruiter_picture),
        );

    let api = Router::new()
        .nest("/auth", auth_api)
        .nest("/jobs", jobs_api)
        .nest("/applications", applications_api)
        .nest("/notifications", notifications_api)
        .nest("/events", events_api)
        .nest("/admin", admin_api)
        .nest("/cv", cv_api)
        .nest("/applicants", applicants_api)
        .nest("/recruiters", recruiters_api);

    let uploads_dir = state.config.uploads_dir.clone();
    tracing::info!(dir = %uploads_dir.display(), "serving uploads");

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .nest_service(PUBLIC_PREFIX, ServeDir::new(uploads_dir))
        .fallback(route_not_found)
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}

/// Reads a multipart file part. Empty parts count as "no file".
pub(crate) async fn read_upload(field: Field<'_>) -> Result<Option<UploadedFile>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await?;
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile {
        file_name,
        content_type,
        data,
    }))
}
