//! Fixtures shared by unit tests and the HTTP tests under `tests/`.

use axum::Router;
use bytes::Bytes;
use tempfile::TempDir;

use crate::config::{Config, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
use crate::database::seed::seed_default_admin;
use crate::repository::Repositories;
use crate::routes::build_router;
use crate::services::upload_service::UploadedFile;
use crate::AppState;

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: "postgres://localhost/unused".to_string(),
        database_max_connections: 1,
        jwt_secret: "test-secret".to_string(),
        session_ttl_hours: 1,
        uploads_dir: std::env::temp_dir().join("recruitment-portal-uploads"),
        admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
        admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
    }
}

pub fn temp_upload_root() -> TempDir {
    tempfile::tempdir().expect("create temp upload dir")
}

pub fn png_file(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        data: Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]),
    }
}

pub fn pdf_file(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        content_type: Some("application/pdf".to_string()),
        data: Bytes::from_static(b"%PDF-1.4 test document"),
    }
}

/// A full router over an in-memory store with the default admin seeded.
/// The upload directory lives as long as the returned value.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub uploads: TempDir,
}

pub async fn test_app() -> TestApp {
    let uploads = temp_upload_root();
    let mut config = test_config();
    config.uploads_dir = uploads.path().to_path_buf();

    let repos = Repositories::in_memory();
    seed_default_admin(repos.users.as_ref(), &config)
        .await
        .expect("seed admin");

    let state = AppState::new(config, repos);
    TestApp {
        router: build_router(state.clone()),
        state,
        uploads,
    }
}
