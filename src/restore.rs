//! Put every repository in a workspace back to its recorded commit.
//!
//! Restore is best-effort: each repository is handled on its own and a
//! failed checkout never stops the remaining ones. Nothing is rolled back.

use log::{debug, info, warn};
use std::path::Path;

use crate::discovery::{discover, ensure_directory, repo_name};
use crate::error::{Result, SyncError};
use crate::git_ops;
use crate::types::{CommitIndex, RestoreEntry, RestoreOutcome, RestoreReport, Snapshot};

#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreOptions {
    /// Report what would be checked out without touching any repository.
    pub dry_run: bool,
}

/// Progress notifications emitted while restoring.
#[derive(Debug)]
pub enum RestoreEvent<'a> {
    /// A checkout is about to run (or would run, in dry-run mode).
    Started {
        name: &'a str,
        path: &'a Path,
        commit: &'a str,
    },
    /// A repository has been handled, whatever the outcome.
    Finished(&'a RestoreEntry),
}

/// Restore every repository in the workspace to its recorded commit.
pub fn restore(
    workspace_root: &Path,
    anchor_root: &Path,
    options: &RestoreOptions,
) -> Result<RestoreReport> {
    restore_with(workspace_root, anchor_root, options, |_| {})
}

/// Restore the workspace, streaming per-repository progress to `on_event`.
///
/// Fails with `NoSnapshot` before touching anything if the anchor has no
/// recorded anchor entry. Per-repository failures end up in the report.
pub fn restore_with<F>(
    workspace_root: &Path,
    anchor_root: &Path,
    options: &RestoreOptions,
    mut on_event: F,
) -> Result<RestoreReport>
where
    F: FnMut(RestoreEvent<'_>),
{
    ensure_directory(workspace_root)?;
    ensure_directory(anchor_root)?;

    let snapshot = Snapshot::from_store(anchor_root)?;
    let index = snapshot
        .commit_index()
        .ok_or_else(|| SyncError::NoSnapshot {
            path: anchor_root.to_path_buf(),
        })?;
    debug!("Loaded {} restore targets", index.len());

    let mut report = RestoreReport::default();
    for repo_path in discover(workspace_root)? {
        let entry = restore_repo(&repo_path, &index, options, &mut on_event);
        on_event(RestoreEvent::Finished(&entry));
        report.entries.push(entry);
    }
    Ok(report)
}

fn restore_repo<F>(
    repo_path: &Path,
    index: &CommitIndex,
    options: &RestoreOptions,
    on_event: &mut F,
) -> RestoreEntry
where
    F: FnMut(RestoreEvent<'_>),
{
    let name = repo_name(repo_path);
    let mut entry = RestoreEntry {
        name,
        path: repo_path.to_path_buf(),
        commit: None,
        outcome: RestoreOutcome::NotInSnapshot,
        message: None,
    };

    let Some(target) = index.get(&entry.name) else {
        warn!(
            "Repository {} is not in the snapshot, skipping",
            repo_path.display()
        );
        return entry;
    };
    entry.commit = Some(target.commit.clone());

    match git_ops::is_bare(repo_path) {
        Ok(false) => {}
        Ok(true) => {
            warn!("Repository at {} is bare, skipping", repo_path.display());
            entry.outcome = RestoreOutcome::InvalidRepository;
            entry.message = Some("bare repository".to_string());
            return entry;
        }
        Err(e) => {
            warn!(
                "Repository at {} is invalid, skipping: {e:#}",
                repo_path.display()
            );
            entry.outcome = RestoreOutcome::InvalidRepository;
            entry.message = Some(format!("{e:#}"));
            return entry;
        }
    }

    on_event(RestoreEvent::Started {
        name: &entry.name,
        path: repo_path,
        commit: &target.commit,
    });

    if options.dry_run {
        entry.outcome = RestoreOutcome::WouldCheckOut;
        return entry;
    }

    match git_ops::checkout(repo_path, target) {
        Ok(checked_out) => {
            info!("Checked out {} to {}", repo_path.display(), checked_out);
            entry.outcome = RestoreOutcome::CheckedOut;
            if checked_out != target.commit {
                entry.message = Some(format!("on branch {checked_out}"));
            }
        }
        Err(e) => {
            warn!("{e}");
            entry.outcome = RestoreOutcome::Failed;
            entry.message = Some(e.cause);
        }
    }
    entry
}
