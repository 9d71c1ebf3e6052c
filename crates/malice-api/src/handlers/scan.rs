use crate::constants::MALWARE_FIELD;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, persist_upload};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use malice_core::{AppError, PluginResults};
use malice_services::sha256_hex;
use std::sync::Arc;

/// `POST /scan`: scan the file uploaded in the `malware` multipart field.
///
/// The sample is written to a temporary file that is removed when the
/// request finishes, whatever the scan outcome.
pub async fn scan_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PluginResults>, HttpAppError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected non-multipart upload");
        AppError::BadRequest(crate::constants::MISSING_FILE_MESSAGE.to_string())
    })?;

    let upload = extract_multipart_file(multipart, MALWARE_FIELD).await?;
    tracing::debug!(
        filename = upload.filename.as_deref().unwrap_or("unknown"),
        size = upload.data.len(),
        "Received upload"
    );

    let id = sha256_hex(&upload.data);
    let tmpfile = persist_upload(&state.upload_dir, upload.data).await?;

    let result = state.clamav.scan(tmpfile.path(), state.scan_timeout).await;

    if let Err(e) = tmpfile.close() {
        tracing::warn!(error = %e, "Failed to remove uploaded sample");
    }

    tracing::info!(
        id = %id,
        infected = result.infected,
        result = %result.result_label,
        "Upload scanned"
    );

    Ok(Json(PluginResults::new(id, result)))
}
