//! malice-clamav: ClamAV plugin for Malice.
//!
//! `malice-clamav <file>` scans a file and prints JSON (or a markdown table
//! with `--table`). `update` refreshes signatures, `web` serves `POST /scan`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use malice_cli::{init_tracing, run_scan, ScanOptions};
use malice_core::PluginConfig;
use malice_services::ClamAVService;
use std::path::PathBuf;
use std::time::Duration;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "malice-clamav", about = "Malice ClamAV Plugin")]
struct Cli {
    /// Verbose output
    #[arg(short = 'V', long, global = true)]
    verbose: bool,
    /// Output as Markdown table
    #[arg(short, long, global = true)]
    table: bool,
    /// POST results to the Malice webhook (MALICE_ENDPOINT)
    #[arg(short, long, global = true)]
    callback: bool,
    /// Send the webhook request through MALICE_PROXY
    #[arg(short = 'x', long, global = true)]
    proxy: bool,
    /// Plugin timeout in seconds
    #[arg(long, env = "MALICE_TIMEOUT", default_value_t = 60, global = true)]
    timeout: u64,

    /// File to scan
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a file (the default action)
    Scan {
        /// File to scan
        path: PathBuf,
    },
    /// Update virus definitions
    #[command(alias = "u")]
    Update,
    /// Create a ClamAV scan web service
    Web,
}

impl Cli {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            table: self.table,
            callback: self.callback,
            proxy: self.proxy,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads MALICE_TIMEOUT.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PluginConfig::from_env().context("Failed to load configuration")?;
    let timeout = Duration::from_secs(cli.timeout);
    let options = cli.scan_options();

    let path = match cli.command {
        Some(Commands::Update) => {
            return ClamAVService::from_config(&config)
                .update(timeout)
                .await
                .context("Failed to update virus definitions");
        }
        Some(Commands::Web) => return malice_api::serve(&config).await,
        Some(Commands::Scan { path }) => path,
        None => cli
            .path
            .context("Please supply a file to scan with malice/clamav")?,
    };

    if options.callback {
        config.validate().context("Invalid callback configuration")?;
    }

    let output = run_scan(&config, &path, options, timeout).await?;
    println!("{}", output);
    Ok(())
}
