//! Custom error types for the SFTP synchronizer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Local root '{}' does not exist or is not a directory", .0.display())]
    InvalidRoot(PathBuf),

    #[error("Folder '{}' is not inside local root '{}'", folder.display(), root.display())]
    PathMapping { folder: PathBuf, root: PathBuf },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Could not list remote path {remote_path}: {reason}")]
    Listing { remote_path: String, reason: String },

    #[error("Could not download {remote_path}: {reason}")]
    Download { remote_path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
