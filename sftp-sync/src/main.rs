//! SFTP Sync - Main entry point
//!
//! Fetches the newest remote file for every terminal local folder and prunes
//! the older local copies.

use anyhow::Result;
use clap::Parser;
use sftp_sync::config::{Config, Credentials, DEFAULT_CONFIG_PATH, DEFAULT_CREDENTIALS_PATH};
use sftp_sync::remote::sftp::SftpRemote;
use sftp_sync::{utils, SyncExecutor, TracingLogger};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to SFTP credentials file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Both files must exist before anything else happens
    let mut config = Config::from_file(&args.config)?;
    let credentials = Credentials::from_file(&args.credentials)?;

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    let _log_guard = utils::logger::init(&config.log, log_level)?;

    tracing::info!("=== Starting sftp-sync v{} ===", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate_local_root() {
        tracing::error!("{}", e);
        return Err(e.into());
    }
    config.local_root = std::path::absolute(&config.local_root)?;

    tracing::info!(
        "Syncing {} from {}@{}:{}",
        config.local_root.display(),
        credentials.username,
        credentials.host,
        config.remote_root
    );

    let executor = SyncExecutor::new(
        SftpRemote::new(credentials),
        &config,
        Arc::new(TracingLogger),
    );

    // Folders are processed one after another on this thread
    let stats = executor.run();

    if stats.folders_with_error > 0 {
        tracing::warn!("{} folders could not be synchronized", stats.folders_with_error);
    }

    Ok(())
}
