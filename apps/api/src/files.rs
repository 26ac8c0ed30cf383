//! Generic file upload into the configured upload directory.

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub filename: String,
    pub size: usize,
}

/// Reduces a client-supplied name to a safe base name: no directories,
/// only letters, digits, `.`, `-` and `_`. `None` if nothing usable remains.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    (!cleaned.is_empty() && cleaned.chars().any(|c| c != '_')).then_some(cleaned)
}

/// POST /api/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .and_then(sanitize_filename)
            .ok_or_else(|| AppError::Validation("No file selected".to_string()))?;
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }

        save(&state.config.upload_dir, &filename, &bytes).await?;
        info!("Uploaded {filename} ({} bytes)", bytes.len());

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully",
            filename,
            size: bytes.len(),
        }));
    }

    Err(AppError::Validation("No file selected".to_string()))
}

async fn save(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(filename), bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_filename("C:\\docs\\cv.pdf").as_deref(), Some("cv.pdf"));
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my cv (1).pdf").as_deref(), Some("my_cv__1_.pdf"));
        assert_eq!(sanitize_filename("이력서.pdf").as_deref(), Some("이력서.pdf"));
        assert_eq!(sanitize_filename(".env").as_deref(), Some("env"));
    }

    #[test]
    fn test_sanitize_rejects_empty_names() {
        assert!(sanitize_filename("").is_none());
        assert!(sanitize_filename("dir/").is_none());
        assert!(sanitize_filename("???").is_none());
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("uploads");
        save(&target, "a.txt", b"hello").await.unwrap();
        assert_eq!(std::fs::read(target.join("a.txt")).unwrap(), b"hello");
    }
}
