//! Sync executor - Drives one synchronization run.
//!
//! Folders are handled one at a time: map to the remote path, list it, pick
//! the newest file, download it when it is not already local, then prune the
//! folder down to that file. A folder that fails is counted and the run moves
//! on; nothing short of a fatal setup error stops it.

pub mod stats;

use crate::config::Config;
use crate::fs::{discover_terminal_folders, prune};
use crate::remote::path::map_to_remote;
use crate::remote::{select_newest, RemoteStore};
use crate::utils::errors::{Result, SyncError};
use crate::utils::logger::SyncLogger;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub use stats::RunStatistics;

/// What happened to the newest remote file of a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// A file with that name was already in the folder; nothing was fetched
    AlreadyLocal,
    Downloaded {
        path: PathBuf,
        /// Size taken from the remote listing
        bytes: u64,
    },
    Failed,
}

/// Result of a folder pass that did not hit an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// The remote directory holds no files
    NothingToSync { remote_path: String },
    Synced {
        remote_path: String,
        /// Name of the newest remote file, the one kept locally
        file: String,
        download: DownloadOutcome,
        deleted: usize,
        /// Set when a failed download stopped the cleanup
        pruning_skipped: bool,
    },
}

/// Main sync executor
pub struct SyncExecutor<R: RemoteStore> {
    remote: R,
    local_root: PathBuf,
    remote_root: String,
    skip_prune_on_failed_download: bool,
    logger: Arc<dyn SyncLogger>,
}

impl<R: RemoteStore> SyncExecutor<R> {
    pub fn new(remote: R, config: &Config, logger: Arc<dyn SyncLogger>) -> Self {
        Self {
            remote,
            local_root: config.local_root.clone(),
            remote_root: config.remote_root.clone(),
            skip_prune_on_failed_download: config.skip_prune_on_failed_download,
            logger,
        }
    }

    /// Process every terminal folder under the local root and log the run
    /// summary.
    pub fn run(&self) -> RunStatistics {
        let start_time = Instant::now();
        let mut stats = RunStatistics::default();

        match discover_terminal_folders(&self.local_root, self.logger.as_ref()) {
            Ok(folders) => {
                self.logger.info(&format!(
                    "Found {} terminal folders to process",
                    folders.len()
                ));

                for folder in &folders {
                    match self.process_folder(folder) {
                        Ok(outcome) => stats.record(&outcome),
                        Err(e @ SyncError::Listing { .. }) => {
                            self.logger.warn(&e.to_string());
                            stats.record_error();
                        }
                        Err(e) => {
                            self.logger.error(&format!(
                                "Error processing folder {}: {}",
                                folder.display(),
                                e
                            ));
                            stats.record_error();
                        }
                    }
                }
            }
            Err(e) => {
                self.logger.error(&format!(
                    "Could not scan local root {}: {}",
                    self.local_root.display(),
                    e
                ));
            }
        }

        stats.log_summary(start_time.elapsed(), self.logger.as_ref());
        stats
    }

    /// Bring one terminal folder in line with its remote counterpart.
    ///
    /// Errors mean the pass stopped early: the folder may be partially
    /// updated and is not rolled back.
    pub fn process_folder(&self, folder: &Path) -> Result<FolderOutcome> {
        let remote_path = map_to_remote(folder, &self.local_root, &self.remote_root)?;
        self.logger.info(&format!(
            "Processing local folder '{}' with remote path '{}'",
            folder.display(),
            remote_path
        ));

        let files = self.remote.list_files(&remote_path)?;
        let Some(newest) = select_newest(&files) else {
            self.logger.info(&format!("No remote files in {}", remote_path));
            return Ok(FolderOutcome::NothingToSync { remote_path });
        };
        self.logger.info(&format!(
            "Most recent remote file: {} ({} bytes, modified {})",
            newest.name,
            stats::format_count(newest.size),
            newest.modified.format("%Y-%m-%d %H:%M:%S")
        ));

        let download = self.fetch_if_missing(folder, &remote_path, &newest.name, newest.size);

        if download == DownloadOutcome::Failed && self.skip_prune_on_failed_download {
            self.logger.warn(&format!(
                "Download failed, leaving existing files in {} untouched",
                folder.display()
            ));
            return Ok(FolderOutcome::Synced {
                remote_path,
                file: newest.name.clone(),
                download,
                deleted: 0,
                pruning_skipped: true,
            });
        }

        let deleted = prune(folder, &newest.name, self.logger.as_ref());
        if deleted > 0 {
            self.logger.info(&format!(
                "{} stale files deleted in {}",
                deleted,
                folder.display()
            ));
        } else {
            self.logger.debug(&format!(
                "No stale files to delete in {}",
                folder.display()
            ));
        }

        Ok(FolderOutcome::Synced {
            remote_path,
            file: newest.name.clone(),
            download,
            deleted,
            pruning_skipped: false,
        })
    }

    /// Download `name` unless a file with that name already exists locally.
    /// Only existence is checked, never size or content.
    fn fetch_if_missing(&self, folder: &Path, remote_path: &str, name: &str, size: u64) -> DownloadOutcome {
        let destination = folder.join(name);
        if destination.exists() {
            self.logger.info(&format!(
                "File {} already exists locally, not downloading",
                name
            ));
            return DownloadOutcome::AlreadyLocal;
        }

        match self.remote.download(name, remote_path, &destination) {
            Ok(path) => {
                self.logger.info(&format!(
                    "Downloaded {} to {}",
                    name,
                    path.display()
                ));
                DownloadOutcome::Downloaded { path, bytes: size }
            }
            Err(e) => {
                self.logger.warn(&format!("Could not download {}: {}", name, e));
                DownloadOutcome::Failed
            }
        }
    }
}
