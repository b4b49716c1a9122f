//! Compare the workspace against its recorded snapshot without changing it.

use log::warn;
use std::path::Path;

use crate::discovery::{discover, ensure_directory, repo_name};
use crate::error::{Result, SyncError};
use crate::git_ops::head_commit;
use crate::types::{Snapshot, StatusEntry, StatusReport, SyncState};

/// Compare each repository's HEAD with the commit recorded for it.
pub fn status(workspace_root: &Path, anchor_root: &Path) -> Result<StatusReport> {
    ensure_directory(workspace_root)?;
    ensure_directory(anchor_root)?;

    let snapshot = Snapshot::from_store(anchor_root)?;
    let index = snapshot
        .commit_index()
        .ok_or_else(|| SyncError::NoSnapshot {
            path: anchor_root.to_path_buf(),
        })?;

    let mut report = StatusReport::default();
    for repo_path in discover(workspace_root)? {
        let name = repo_name(&repo_path);
        let recorded = index.get(&name).map(|t| t.commit.clone());
        let current = match head_commit(&repo_path) {
            Ok(sha) => Some(sha),
            Err(e) => {
                warn!("Cannot read HEAD of {}: {e:#}", repo_path.display());
                None
            }
        };

        let state = match (&recorded, &current) {
            (_, None) => SyncState::Unreadable,
            (None, Some(_)) => SyncState::Untracked,
            (Some(r), Some(c)) if r == c => SyncState::InSync,
            (Some(_), Some(_)) => SyncState::Drifted,
        };

        report.entries.push(StatusEntry {
            name,
            path: repo_path,
            recorded,
            current,
            state,
        });
    }
    Ok(report)
}
