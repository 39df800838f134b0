//! Removal of stale files from a terminal folder.

use crate::utils::logger::SyncLogger;
use std::fs;
use std::path::Path;

/// Delete every regular file directly inside `folder` except `keep_name`.
///
/// Directories and the kept file are left alone. `keep_name` does not have
/// to exist: when it is absent every regular file in the folder is removed.
/// A file that cannot be deleted is logged and skipped, and a folder that
/// cannot be listed is logged and yields zero.
///
/// Returns the number of deleted files.
pub fn prune(folder: &Path, keep_name: &str, logger: &dyn SyncLogger) -> usize {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            logger.error(&format!(
                "Error listing stale files in {}: {}",
                folder.display(),
                e
            ));
            return 0;
        }
    };

    let mut deleted = 0;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.error(&format!("Error reading entry in {}: {}", folder.display(), e));
                continue;
            }
        };

        if entry.file_name().to_string_lossy() == keep_name {
            continue;
        }

        // Follows symlinks, so a link to a regular file is pruned as well
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                deleted += 1;
                logger.info(&format!("Deleted stale file: {}", path.display()));
            }
            Err(e) => {
                logger.error(&format!("Could not delete {}: {}", path.display(), e));
            }
        }
    }

    deleted
}
