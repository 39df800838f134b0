//! Mapping of local terminal folders onto the mirrored remote tree.

use crate::utils::errors::{Result, SyncError};
use std::path::{Component, Path};

/// Compute the remote directory that mirrors `local_folder`.
///
/// `local_folder` must be `local_root` or one of its descendants; anything
/// else (including paths escaping through `..`) is a [`SyncError::PathMapping`].
/// The result always uses `/` separators, whatever the local platform uses.
///
/// # Example
/// ```
/// use sftp_sync::remote::path::map_to_remote;
/// use std::path::Path;
///
/// let remote = map_to_remote(Path::new("/a/b/c"), Path::new("/a"), "/r").unwrap();
/// assert_eq!(remote, "/r/b/c");
/// ```
pub fn map_to_remote(local_folder: &Path, local_root: &Path, remote_root: &str) -> Result<String> {
    let mapping_error = || SyncError::PathMapping {
        folder: local_folder.to_path_buf(),
        root: local_root.to_path_buf(),
    };

    let relative = local_folder
        .strip_prefix(local_root)
        .map_err(|_| mapping_error())?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => continue,
            _ => return Err(mapping_error()),
        }
    }

    let remote_root = remote_root.replace('\\', "/");
    if parts.is_empty() {
        return Ok(remote_root);
    }

    let relative = parts.join("/");
    let base = remote_root.trim_end_matches('/');
    Ok(if base.is_empty() && !remote_root.starts_with('/') {
        relative
    } else {
        format!("{}/{}", base, relative)
    })
}

/// Join a remote directory and a file name with a single `/`.
pub fn join_remote(remote_dir: &str, name: &str) -> String {
    if remote_dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", remote_dir.trim_end_matches('/'), name)
    }
}
