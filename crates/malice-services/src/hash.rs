//! Content hashes used as scan identifiers.

use anyhow::Context;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Lowercase hex SHA-256 of the file at `path`.
pub async fn sha256_file(path: &Path) -> anyhow::Result<String> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {} for hashing", path.display()))?;
    Ok(sha256_hex(&data))
}
