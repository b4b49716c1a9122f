//! Types for workspace snapshots.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::path::PathBuf;

// ==================== Domain Types ====================

/// Observable state of one repository at inspection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub branch: String,
    #[serde(rename = "commit-hash")]
    pub commit: String,
}

/// The recorded state of a workspace, as stored in the anchor repository.
///
/// `anchor` is the repository owning the snapshot file; on disk it is a
/// sequence of at most one entry under `repo-info`. `workspace` lists every
/// other repository found at capture time under `ws-status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "repo-info", default, with = "anchor_entry")]
    pub anchor: Option<RepositoryIdentity>,
    #[serde(rename = "ws-status", default, deserialize_with = "null_as_empty")]
    pub workspace: Vec<RepositoryIdentity>,
}

impl Snapshot {
    /// Build a snapshot from freshly inspected repositories.
    ///
    /// Members identical to the anchor (all four fields) are dropped, so the
    /// anchor never appears in its own workspace list. Other repeats are kept.
    pub fn from_discovery<I>(anchor: Option<RepositoryIdentity>, members: I) -> Self
    where
        I: IntoIterator<Item = RepositoryIdentity>,
    {
        let workspace = members
            .into_iter()
            .filter(|member| anchor.as_ref() != Some(member))
            .collect();
        Snapshot { anchor, workspace }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor.is_none() && self.workspace.is_empty()
    }

    /// Flatten the anchor entry and workspace list into a name lookup.
    ///
    /// Returns `None` when there is no anchor entry. Later entries override
    /// earlier ones with the same name.
    pub fn commit_index(&self) -> Option<CommitIndex> {
        let anchor = self.anchor.as_ref()?;
        let mut targets = HashMap::new();
        for identity in std::iter::once(anchor).chain(self.workspace.iter()) {
            targets.insert(
                identity.name.clone(),
                RestoreTarget {
                    commit: identity.commit.clone(),
                    branch: identity.branch.clone(),
                },
            );
        }
        Some(CommitIndex { targets })
    }
}

/// Where a repository should be put back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreTarget {
    pub commit: String,
    /// Branch the repository was on at capture time (may be empty).
    pub branch: String,
}

/// Repository name to restore target, built once per restore.
#[derive(Debug, Clone, Default)]
pub struct CommitIndex {
    targets: HashMap<String, RestoreTarget>,
}

impl CommitIndex {
    pub fn get(&self, name: &str) -> Option<&RestoreTarget> {
        self.targets.get(name)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

mod anchor_entry {
    use super::*;

    pub fn serialize<S>(anchor: &Option<RepositoryIdentity>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(anchor.iter())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RepositoryIdentity>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries: Vec<RepositoryIdentity> = null_as_empty(deserializer)?;
        if entries.len() > 1 {
            log::warn!(
                "Snapshot lists {} anchor entries, using the first ('{}')",
                entries.len(),
                entries[0].name
            );
        }
        Ok(entries.into_iter().next())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RepositoryIdentity>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RepositoryIdentity>>::deserialize(deserializer)?.unwrap_or_default())
}

// ==================== Operation Results ====================

/// Result of a capture run.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSummary {
    pub snapshot_path: PathBuf,
    /// Name of the anchor entry, if the anchor could be inspected.
    pub anchor: Option<String>,
    pub recorded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestoreOutcome {
    CheckedOut,
    WouldCheckOut,
    NotInSnapshot,
    InvalidRepository,
    Failed,
}

/// What happened to one discovered repository during restore.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub outcome: RestoreOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RestoreReport {
    pub entries: Vec<RestoreEntry>,
}

impl RestoreReport {
    pub fn count(&self, outcome: RestoreOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RestoreEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome == RestoreOutcome::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncState {
    InSync,
    Drifted,
    Untracked,
    Unreadable,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    pub state: SyncState,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusReport {
    pub entries: Vec<StatusEntry>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.entries
            .iter()
            .all(|e| matches!(e.state, SyncState::InSync | SyncState::Untracked))
    }
}
