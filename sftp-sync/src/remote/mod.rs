//! Remote side of the synchronizer: the transport boundary, remote path
//! mapping and the choice of the freshest remote file.

pub mod path;
pub mod sftp;

use crate::utils::errors::Result;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// A regular file found in a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileDescriptor {
    pub name: String,

    /// Size in bytes as reported by the server
    pub size: u64,

    pub modified: DateTime<Utc>,
}

/// Listing and download operations the synchronizer needs from a remote.
///
/// Implementations own their credentials. Each call is a single attempt;
/// there is no retry at this boundary.
pub trait RemoteStore {
    /// List the regular files in `remote_path`, newest first (see
    /// [`sort_newest_first`]). An empty directory is `Ok(vec![])`.
    fn list_files(&self, remote_path: &str) -> Result<Vec<RemoteFileDescriptor>>;

    /// Copy `remote_path/name` to `destination` and return the final local
    /// path.
    fn download(&self, name: &str, remote_path: &str, destination: &Path) -> Result<PathBuf>;
}

/// Order descriptors newest first.
///
/// Servers disagree on the order of files sharing a modification time, so
/// ties are broken by name, ascending.
pub fn sort_newest_first(files: &mut [RemoteFileDescriptor]) {
    files.sort_by(|a, b| match b.modified.cmp(&a.modified) {
        Ordering::Equal => a.name.cmp(&b.name),
        other => other,
    });
}

/// The freshest file of a listing already ordered by [`sort_newest_first`],
/// or `None` for an empty listing.
pub fn select_newest(files: &[RemoteFileDescriptor]) -> Option<&RemoteFileDescriptor> {
    files.first()
}
