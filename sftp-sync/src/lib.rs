//! SFTP Sync Library
//!
//! Mirrors a remote SFTP tree onto the terminal folders of a local tree,
//! keeping only the newest remote file in each folder.

pub mod config;
pub mod executor;
pub mod fs;
pub mod remote;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use executor::{RunStatistics, SyncExecutor};
pub use utils::errors::SyncError;
pub use utils::logger::{SyncLogger, TracingLogger};
pub type Result<T> = std::result::Result<T, SyncError>;
