//! Data models for the plugin
//!
//! Scan results, the JSON envelope they travel in, and the tagged outcome of
//! running the scanner binary.

mod scan;

// Re-export all models for convenient imports
pub use scan::{PluginResults, ScanOutcome, ScanResult};
