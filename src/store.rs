//! Snapshot file storage.
//!
//! Manages `<anchor>/.git/ws-lock.yaml`, the recorded state of the workspace
//! owned by the anchor repository.

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::discovery::GIT_MARKER;
use crate::error::{Result, SyncError};
use crate::types::Snapshot;

pub const SNAPSHOT_FILE: &str = "ws-lock.yaml";

/// Resolve the git metadata directory of the anchor repository.
///
/// `.git` is usually a directory. For submodules and linked worktrees it is
/// a file holding a `gitdir: <path>` line, relative to the repository root.
pub fn metadata_dir(anchor_root: &Path) -> PathBuf {
    let marker = anchor_root.join(GIT_MARKER);
    if marker.is_file() {
        if let Ok(content) = fs::read_to_string(&marker) {
            if let Some(dir) = content.lines().find_map(|l| l.strip_prefix("gitdir:")) {
                let dir = Path::new(dir.trim());
                return if dir.is_absolute() {
                    dir.to_path_buf()
                } else {
                    anchor_root.join(dir)
                };
            }
        }
    }
    marker
}

pub fn snapshot_path(anchor_root: &Path) -> PathBuf {
    metadata_dir(anchor_root).join(SNAPSHOT_FILE)
}

/// Read the snapshot owned by `anchor_root`.
///
/// A missing or empty file is a valid first-run state and loads as the empty
/// snapshot.
pub fn load(anchor_root: &Path) -> Result<Snapshot> {
    let path = snapshot_path(anchor_root);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No snapshot at {}, starting empty", path.display());
            return Ok(Snapshot::default());
        }
        Err(source) => return Err(SyncError::Io { path, source }),
    };

    if content.trim().is_empty() {
        return Ok(Snapshot::default());
    }

    let snapshot: Option<Snapshot> =
        serde_yaml_ng::from_str(&content).map_err(|source| SyncError::Parse {
            path: path.clone(),
            source,
        })?;
    Ok(snapshot.unwrap_or_default())
}

/// Overwrite the snapshot owned by `anchor_root`.
///
/// The file is written next to its final location and renamed into place,
/// so readers see either the old or the new content. Returns the path
/// written.
pub fn save(anchor_root: &Path, snapshot: &Snapshot) -> Result<PathBuf> {
    let path = snapshot_path(anchor_root);
    let yaml = serde_yaml_ng::to_string(snapshot).map_err(SyncError::Serialize)?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml).map_err(|source| SyncError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if let Err(source) = fs::rename(&tmp_path, &path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(SyncError::Io { path, source });
    }

    debug!("Wrote snapshot to {}", path.display());
    Ok(path)
}

impl Snapshot {
    /// Load the snapshot recorded in the anchor repository.
    pub fn from_store(anchor_root: &Path) -> Result<Self> {
        load(anchor_root)
    }
}
