//! Terminal folder discovery.
//!
//! A terminal folder is a directory without child directories. Those are the
//! units the synchronizer works on; every other directory only gives them
//! structure.

use crate::utils::errors::Result;
use crate::utils::logger::SyncLogger;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Walk `root` and return every directory that has no subdirectories.
///
/// The root itself is included when it has none. Paths are rooted at `root`
/// and come back sorted by name. A symlink pointing at a directory counts as
/// a child directory but is not followed.
///
/// Directories that cannot be read are logged and left out. A failure on
/// `root` itself is returned as an error.
///
/// # Example
/// ```no_run
/// use sftp_sync::fs::walker::discover_terminal_folders;
/// use sftp_sync::TracingLogger;
/// use std::path::Path;
///
/// let folders = discover_terminal_folders(Path::new("/data/clientes"), &TracingLogger).unwrap();
/// println!("Found {} terminal folders", folders.len());
/// ```
pub fn discover_terminal_folders(root: &Path, logger: &dyn SyncLogger) -> Result<Vec<PathBuf>> {
    let mut directories = Vec::new();
    let mut with_children: HashSet<PathBuf> = HashSet::new();
    let mut unreadable: HashSet<PathBuf> = HashSet::new();

    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                logger.warn(&format!("Skipping unreadable entry during folder discovery: {}", e));
                if let Some(path) = e.path() {
                    unreadable.insert(path.to_path_buf());
                }
                continue;
            }
        };

        if !is_directory(&entry) {
            continue;
        }

        if entry.depth() > 0 {
            if let Some(parent) = entry.path().parent() {
                with_children.insert(parent.to_path_buf());
            }
        }

        if entry.file_type().is_dir() {
            directories.push(entry.into_path());
        }
    }

    Ok(directories
        .into_iter()
        .filter(|dir| !with_children.contains(dir) && !unreadable.contains(dir))
        .collect())
}

fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logger::TracingLogger;
    use std::fs;
    use tempfile::TempDir;

    fn discover(root: &Path) -> Vec<PathBuf> {
        discover_terminal_folders(root, &TracingLogger).unwrap()
    }

    #[test]
    fn test_empty_root_is_terminal() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(discover(temp_dir.path()), vec![temp_dir.path().to_path_buf()]);
    }

    #[test]
    fn test_only_leaf_directories_are_returned() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        fs::create_dir_all(root.join("a/b/c"))?;
        fs::create_dir_all(root.join("a/d"))?;
        fs::create_dir_all(root.join("e"))?;
        fs::write(root.join("a/file.csv"), b"x")?;
        fs::write(root.join("e/file.csv"), b"x")?;

        let folders = discover(root);
        assert_eq!(
            folders,
            vec![root.join("a/b/c"), root.join("a/d"), root.join("e")]
        );
        Ok(())
    }

    #[test]
    fn test_no_returned_folder_has_a_subdirectory() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        for dir in ["x/y", "x/z/w", "q", "r/s/t/u"] {
            fs::create_dir_all(root.join(dir))?;
        }

        let folders = discover(root);
        for folder in &folders {
            let has_subdir = fs::read_dir(folder)?
                .filter_map(|e| e.ok())
                .any(|e| e.path().is_dir());
            assert!(!has_subdir, "{} has a subdirectory", folder.display());
        }

        // every directory without children is present
        for leaf in ["x/y", "x/z/w", "q", "r/s/t/u"] {
            assert!(folders.contains(&root.join(leaf)));
        }
        assert_eq!(folders.len(), 4);
        Ok(())
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = discover_terminal_folders(&temp_dir.path().join("missing"), &TracingLogger);
        assert!(result.is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinked_directory_counts_as_child() -> std::io::Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("target"))?;
        fs::create_dir_all(root.join("holder"))?;
        std::os::unix::fs::symlink(root.join("target"), root.join("holder/link"))?;

        let folders = discover(root);
        assert_eq!(folders, vec![root.join("target")]);
        Ok(())
    }
}
