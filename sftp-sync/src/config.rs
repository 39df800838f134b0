//! Configuration management for the synchronizer.
//!
//! Two JSON files are read once at startup: the run configuration (local and
//! remote roots, logging) and the SFTP credentials.

use crate::utils::errors::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";
pub const DEFAULT_CREDENTIALS_PATH: &str = "config/credenciales.json";

/// Key of the credentials block inside the credentials file.
const CREDENTIALS_KEY: &str = "SFTP";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local base directory whose terminal folders are synchronized
    #[serde(rename = "directorio_local")]
    pub local_root: PathBuf,

    /// Remote base directory mirroring `local_root`
    #[serde(rename = "directorio_remoto", default = "default_remote_root")]
    pub remote_root: String,

    /// Skip pruning a folder when its download was attempted and failed.
    /// Off by default: pruning then removes every regular file, since the
    /// file to keep never arrived.
    #[serde(
        rename = "omitir_limpieza_si_falla_descarga",
        alias = "skip_prune_on_failed_download",
        default
    )]
    pub skip_prune_on_failed_download: bool,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output (stdout, file, both)
    #[serde(default)]
    pub output: LogOutput,

    /// Directory holding rotated log files
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Log file name prefix
    #[serde(default = "default_log_file_name")]
    pub file_name: String,

    #[serde(default)]
    pub rotation: LogRotation,

    /// Rotated files kept on disk
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    File,
    Both,
}

impl LogOutput {
    pub fn writes_stdout(self) -> bool {
        matches!(self, LogOutput::Stdout | LogOutput::Both)
    }

    pub fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<LogRotation> for tracing_appender::rolling::Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Self::MINUTELY,
            LogRotation::Hourly => Self::HOURLY,
            LogRotation::Daily => Self::DAILY,
            LogRotation::Never => Self::NEVER,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: LogOutput::default(),
            directory: default_log_directory(),
            file_name: default_log_file_name(),
            rotation: LogRotation::default(),
            max_files: default_max_log_files(),
        }
    }
}

// Default values
fn default_remote_root() -> String {
    "/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file_name() -> String {
    "sftp-sync.log".to_string()
}

fn default_max_log_files() -> usize {
    7
}

fn default_port() -> u16 {
    22
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = read_required(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Fails with [`SyncError::InvalidRoot`] unless the local root is an
    /// existing directory.
    pub fn validate_local_root(&self) -> Result<()> {
        if self.local_root.as_os_str().is_empty() || !self.local_root.is_dir() {
            return Err(SyncError::InvalidRoot(self.local_root.clone()));
        }
        Ok(())
    }
}

/// SFTP connection settings. Passed as-is to the transport.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(alias = "hostname")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(alias = "user")]
    pub username: String,

    #[serde(default)]
    pub password: Option<String>,

    /// Private key file, used instead of the password when set
    #[serde(default)]
    pub private_key: Option<PathBuf>,

    #[serde(default)]
    pub passphrase: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("private_key", &self.private_key)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    /// Load the `SFTP` block of a credentials JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = read_required(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(content)?;
        let block = document.remove(CREDENTIALS_KEY).ok_or_else(|| {
            SyncError::Config(format!("credentials file has no '{}' entry", CREDENTIALS_KEY))
        })?;
        let credentials: Credentials = serde_json::from_value(block)?;
        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(SyncError::Config("SFTP host is empty".to_string()));
        }
        if self.password.is_none() && self.private_key.is_none() {
            return Err(SyncError::Config(
                "SFTP credentials need a password or a private_key".to_string(),
            ));
        }
        Ok(())
    }
}

fn read_required(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(SyncError::MissingFile(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}
