//! Malice ClamAV HTTP API
//!
//! A single upload endpoint (`POST /scan`) that scans the posted sample with
//! ClamAV and answers with the plugin's JSON envelope.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
mod utils;

pub use error::HttpAppError;
pub use setup::initialize_app;
pub use state::AppState;

use malice_core::PluginConfig;

/// Build the app from `config` and serve it until shutdown.
pub async fn serve(config: &PluginConfig) -> anyhow::Result<()> {
    let (_state, router) = initialize_app(config)?;
    setup::server::start_server(config, router).await
}
