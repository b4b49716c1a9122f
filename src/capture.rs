//! Record the current commit of every repository in a workspace.

use log::{info, warn};
use std::path::Path;

use crate::discovery::{discover, ensure_directory};
use crate::error::Result;
use crate::git_ops::inspect;
use crate::store;
use crate::types::{CaptureSummary, Snapshot};

/// Inspect the anchor and every discovered repository into a fresh snapshot.
///
/// Returns the snapshot and the number of repositories that could not be
/// inspected and were left out.
pub fn build_snapshot(workspace_root: &Path, anchor_root: &Path) -> Result<(Snapshot, usize)> {
    let anchor = match inspect(anchor_root) {
        Ok(identity) => Some(identity),
        Err(e) => {
            warn!("{e}; recording snapshot without an anchor entry");
            None
        }
    };

    let mut skipped = 0;
    let mut members = Vec::new();
    for repo_path in discover(workspace_root)? {
        match inspect(&repo_path) {
            Ok(identity) => members.push(identity),
            Err(e) => {
                warn!("Skipping repository: {e}");
                skipped += 1;
            }
        }
    }

    Ok((Snapshot::from_discovery(anchor, members), skipped))
}

/// Capture the workspace state into the anchor's snapshot file, replacing any
/// previous snapshot.
pub fn capture(workspace_root: &Path, anchor_root: &Path) -> Result<CaptureSummary> {
    ensure_directory(workspace_root)?;
    ensure_directory(anchor_root)?;

    let (snapshot, skipped) = build_snapshot(workspace_root, anchor_root)?;
    let snapshot_path = store::save(anchor_root, &snapshot)?;

    info!(
        "Captured {} repositories into {}",
        snapshot.workspace.len(),
        snapshot_path.display()
    );

    Ok(CaptureSummary {
        snapshot_path,
        anchor: snapshot.anchor.map(|a| a.name),
        recorded: snapshot.workspace.len(),
        skipped,
    })
}
