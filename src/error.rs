//! Error types for workspace capture and restore.
//!
//! `SyncError` covers failures that abort a whole operation. Per-repository
//! failures (`InspectionError`, `CheckoutError`) are caught by the caller,
//! logged, and the remaining repositories are still processed.

use std::path::PathBuf;
use thiserror::Error;

/// Failures fatal to a capture, restore or status run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Invalid path {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("Failed to access snapshot file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Failed to serialize snapshot")]
    Serialize(#[source] serde_yaml_ng::Error),

    #[error(
        "No snapshot recorded for {} (run `ws-lock capture` first)",
        .path.display()
    )]
    NoSnapshot { path: PathBuf },
}

/// Failure to read a single repository's identity.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("Repository at {} has a detached HEAD (no active branch)", .path.display())]
    DetachedHead { path: PathBuf },

    #[error("Failed to inspect repository at {}: {cause}", .path.display())]
    Failed { path: PathBuf, cause: String },
}

impl InspectionError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            InspectionError::DetachedHead { path } | InspectionError::Failed { path, .. } => path,
        }
    }
}

/// Failure to check out a recorded commit in one repository.
#[derive(Debug, Clone, Error)]
#[error("Failed to check out {} to {commit}: {cause}", .path.display())]
pub struct CheckoutError {
    pub path: PathBuf,
    pub commit: String,
    pub cause: String,
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
