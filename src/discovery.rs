//! Repository discovery inside a workspace directory tree.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SyncError};

/// Marker entry that makes a directory a repository root.
pub const GIT_MARKER: &str = ".git";

/// Check if a path is a git repository root: it directly contains a `.git`
/// directory.
///
/// Submodules and linked worktrees (where `.git` is a `gitdir:` file) are not
/// workspace members.
pub fn is_git_repo(path: &Path) -> bool {
    path.join(GIT_MARKER).is_dir()
}

/// Whether `path` carries any `.git` entry, directory or `gitdir:` file.
pub fn has_git_marker(path: &Path) -> bool {
    path.join(GIT_MARKER).exists()
}

/// Fail with `InvalidPath` unless `path` is an existing directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SyncError::InvalidPath {
            path: path.to_path_buf(),
            reason: "does not exist".to_string(),
        });
    }
    if !path.is_dir() {
        return Err(SyncError::InvalidPath {
            path: path.to_path_buf(),
            reason: "is not a directory".to_string(),
        });
    }
    Ok(())
}

/// Name of a repository: the last component of its path.
///
/// Trailing separators are ignored; paths ending in `..` (or the bare `.`)
/// are resolved against the filesystem first.
pub fn repo_name(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}

/// Find every repository root under `workspace_root`, the root included.
///
/// The walk continues below a repository root so nested repositories are
/// found too, but never enters `.git` and never follows symlinks. Siblings
/// are visited in file-name order.
pub fn discover(workspace_root: &Path) -> Result<Vec<PathBuf>> {
    ensure_directory(workspace_root)?;

    let walker = WalkDir::new(workspace_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != GIT_MARKER);

    let mut repos = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path during discovery: {e}");
                continue;
            }
        };
        if entry.file_type().is_dir() && is_git_repo(entry.path()) {
            debug!("Found repository at {}", entry.path().display());
            repos.push(entry.into_path());
        }
    }

    debug!(
        "Discovered {} repositories under {}",
        repos.len(),
        workspace_root.display()
    );
    Ok(repos)
}
