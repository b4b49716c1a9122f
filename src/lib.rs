//! Pin a workspace of independently cloned git repositories to a consistent
//! set of commits.
//!
//! `capture` records the name, remote URL, branch and commit of every
//! repository under a workspace into `.git/ws-lock.yaml` of one anchor
//! repository. `restore` checks each repository back out to the commit
//! recorded for its name.

pub mod capture;
pub mod discovery;
pub mod error;
pub mod git_ops;
pub mod output;
pub mod restore;
pub mod status;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_support;

pub use capture::capture;
pub use discovery::discover;
pub use error::{CheckoutError, InspectionError, SyncError};
pub use git_ops::inspect;
pub use restore::{restore, restore_with, RestoreEvent, RestoreOptions};
pub use status::status;
pub use types::{CommitIndex, RepositoryIdentity, RestoreReport, Snapshot};
