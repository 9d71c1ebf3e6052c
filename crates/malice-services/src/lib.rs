//! Malice ClamAV Services Layer
//!
//! Process-level plumbing around the ClamAV binaries: running `clamscan` and
//! `freshclam` under a timeout, hashing samples, and delivering results to a
//! Malice collection endpoint. The API and CLI crates depend on this facade;
//! parsing and models live in `malice-core`.

pub mod callback;
pub mod clamav;
pub mod command;
pub mod hash;

pub use callback::{CallbackClient, CallbackResponse, SCAN_ID_HEADER};
pub use clamav::ClamAVService;
pub use command::{CommandError, CommandOutput, ExternalCommand};
pub use hash::{sha256_file, sha256_hex};
