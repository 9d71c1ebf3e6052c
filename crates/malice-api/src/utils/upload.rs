//! Multipart extraction and temporary persistence of uploaded samples

use anyhow::Context;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use malice_core::AppError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::constants::{MISSING_FILE_MESSAGE, UPLOAD_FILE_PREFIX, UPLOAD_TOO_LARGE_MESSAGE};

/// A file read from a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Bytes,
    pub filename: Option<String>,
}

/// Read the first field named `field_name` fully into memory. Other fields are
/// skipped. A missing field or a broken multipart body is a bad request; a
/// body cut off by the request size limit is `PayloadTooLarge`.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to read multipart"))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Failed to read file data"))?;

        return Ok(UploadedFile { data, filename });
    }

    tracing::debug!(field = field_name, "Multipart form has no file field");
    Err(AppError::BadRequest(MISSING_FILE_MESSAGE.to_string()))
}

fn multipart_error(err: MultipartError, context: &str) -> AppError {
    tracing::debug!(error = %err, status = %err.status(), "{}", context);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(UPLOAD_TOO_LARGE_MESSAGE.to_string())
    } else {
        AppError::BadRequest(MISSING_FILE_MESSAGE.to_string())
    }
}

/// Write `data` to a fresh temporary file in `dir`. The file is removed when
/// the returned handle is dropped.
pub async fn persist_upload(dir: &Path, data: Bytes) -> Result<NamedTempFile, AppError> {
    let dir = dir.to_path_buf();
    let tmpfile = tokio::task::spawn_blocking(move || -> anyhow::Result<NamedTempFile> {
        let mut tmpfile = tempfile::Builder::new()
            .prefix(UPLOAD_FILE_PREFIX)
            .tempfile_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmpfile
            .write_all(&data)
            .context("Failed to write uploaded data")?;
        tmpfile.flush().context("Failed to flush uploaded data")?;
        Ok(tmpfile)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Upload persistence task failed: {}", e)))??;

    Ok(tmpfile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persisted_upload_lives_until_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let tmpfile = persist_upload(dir.path(), Bytes::from_static(b"sample"))
            .await
            .unwrap();

        let path = tmpfile.path().to_path_buf();
        assert!(path.starts_with(dir.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(UPLOAD_FILE_PREFIX));
        assert_eq!(std::fs::read(&path).unwrap(), b"sample");

        drop(tmpfile);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn missing_directory_is_an_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = persist_upload(&dir.path().join("missing"), Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalWithSource { .. }));
    }
}
