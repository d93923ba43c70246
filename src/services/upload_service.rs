use std::path::{Component, Path as StdPath, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Public URL prefix under which the upload root is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const MB: usize = 1024 * 1024;

/// A file part received in a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ProfilePicture,
    CvFile,
}

impl UploadKind {
    fn directory(&self) -> &'static str {
        match self {
            UploadKind::ProfilePicture => "profiles",
            UploadKind::CvFile => "cvs",
        }
    }

    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::ProfilePicture => &["jpeg", "jpg", "png", "gif", "webp"],
            UploadKind::CvFile => &["pdf", "doc", "docx", "jpeg", "jpg", "png"],
        }
    }

    pub fn max_bytes(&self) -> usize {
        match self {
            UploadKind::ProfilePicture => 5 * MB,
            UploadKind::CvFile => 10 * MB,
        }
    }

    fn rejection(&self) -> &'static str {
        match self {
            UploadKind::ProfilePicture => "Only image files are allowed (jpeg, jpg, png, gif, webp)",
            UploadKind::CvFile => "Only PDF, DOC, DOCX, and image files are allowed",
        }
    }

    fn file_name(&self, owner: Uuid, index: Option<usize>, ext: &str) -> String {
        let millis = Utc::now().timestamp_millis();
        match (self, index) {
            (UploadKind::ProfilePicture, _) => format!("{}-{}.{}", owner, millis, ext),
            (UploadKind::CvFile, None) => format!("cv-{}-{}.{}", owner, millis, ext),
            (UploadKind::CvFile, Some(n)) => format!("cv-{}-{}-{}.{}", owner, millis, n, ext),
        }
    }
}

/// Disk-backed store for uploaded files. Stored files are addressed by their
/// public path (`/uploads/<dir>/<name>`), which is what the records keep.
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &StdPath {
        &self.root
    }

    pub async fn save(
        &self,
        kind: UploadKind,
        owner: Uuid,
        index: Option<usize>,
        file: &UploadedFile,
    ) -> Result<String> {
        let ext = check_file(kind, file)?;

        let dir = self.root.join(kind.directory());
        fs::create_dir_all(&dir).await?;

        let name = kind.file_name(owner, index, &ext);
        fs::write(dir.join(&name), &file.data).await.map_err(|e| {
            tracing::error!(error = %e, file = %name, "failed to write upload");
            Error::Io(e)
        })?;

        tracing::debug!(file = %name, bytes = file.data.len(), "upload stored");
        Ok(format!("{}/{}/{}", PUBLIC_PREFIX, kind.directory(), name))
    }

    /// Best-effort removal of a stored file by its public path.
    pub async fn remove(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            tracing::warn!(path = %public_path, "refusing to remove path outside upload root");
            return;
        };
        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %public_path, "upload removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(error = %e, path = %public_path, "failed to remove upload"),
        }
    }

    pub async fn remove_all(&self, public_paths: &[String]) {
        for path in public_paths {
            self.remove(path).await;
        }
    }

    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = public_path
            .strip_prefix(PUBLIC_PREFIX)?
            .trim_start_matches('/');
        let relative = StdPath::new(relative);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (safe && !relative.as_os_str().is_empty()).then(|| self.root.join(relative))
    }
}

fn check_file(kind: UploadKind, file: &UploadedFile) -> Result<String> {
    let ext = StdPath::new(&file.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !kind.allowed_extensions().contains(&ext.as_str()) {
        return Err(Error::BadRequest(kind.rejection().to_string()));
    }
    if file.data.is_empty() {
        return Err(Error::BadRequest("Uploaded file is empty".to_string()));
    }
    if file.data.len() > kind.max_bytes() {
        return Err(Error::BadRequest(format!(
            "File too large (max {} MB)",
            kind.max_bytes() / MB
        )));
    }

    if ext == "pdf" && !file.data.starts_with(b"%PDF") {
        return Err(Error::BadRequest("Invalid PDF file content".into()));
    }
    if (ext == "jpg" || ext == "jpeg") && !file.data.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::BadRequest("Invalid JPEG file content".into()));
    }
    if ext == "png" && !file.data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Err(Error::BadRequest("Invalid PNG file content".into()));
    }

    Ok(ext)
}
