//! HTTP surface constants

/// Upload endpoint
pub const SCAN_PATH: &str = "/scan";

/// Liveness endpoint
pub const HEALTH_PATH: &str = "/health";

/// Multipart field carrying the sample
pub const MALWARE_FIELD: &str = "malware";

/// Prefix of temporary files created for uploads
pub const UPLOAD_FILE_PREFIX: &str = "web_";

/// Scan timeout applied to uploads, independent of the CLI `--timeout`
pub const UPLOAD_SCAN_TIMEOUT_SECS: u64 = 60;

/// Body returned when the upload is missing or unreadable
pub const MISSING_FILE_MESSAGE: &str = "Please supply a valid file to scan.";

/// Body returned when the upload exceeds `MAX_UPLOAD_SIZE_MB`
pub const UPLOAD_TOO_LARGE_MESSAGE: &str = "Uploaded file is too large.";
