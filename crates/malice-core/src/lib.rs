//! Malice ClamAV Core Library
//!
//! Domain models, scanner output parsing, the signature-update stamp, error
//! types and configuration shared by the service, API and CLI crates.

pub mod config;
pub mod error;
pub mod markdown;
pub mod models;
pub mod parser;
pub mod update_state;

// Re-export commonly used types
pub use config::PluginConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{PluginResults, ScanOutcome, ScanResult};
pub use parser::{parse, parse_outcome, ParseError};
pub use update_state::UpdateState;
