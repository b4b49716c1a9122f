//! Git operations used to inspect and restore repositories.
//!
//! Everything shells out to the `git` executable and blocks until it exits.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::discovery::{has_git_marker, repo_name};
use crate::error::{CheckoutError, InspectionError};
use crate::types::{RepositoryIdentity, RestoreTarget};

fn git_output(repo_path: &Path, args: &[&str]) -> Result<Output> {
    debug!("git {} (in {})", args.join(" "), repo_path.display());
    let mut cmd = Command::new("git");
    // Keep git from searching above the repository root
    if let Some(parent) = repo_path
        .canonicalize()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        cmd.env("GIT_CEILING_DIRECTORIES", parent);
    }
    cmd.args(args)
        .current_dir(repo_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))
}

fn git_stdout(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = git_output(repo_path, args)?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Full hex SHA of the commit checked out at HEAD.
pub fn head_commit(repo_path: &Path) -> Result<String> {
    git_stdout(repo_path, &["rev-parse", "HEAD"])
}

/// Name of the checked-out branch, or `None` for a detached HEAD.
pub fn current_branch(repo_path: &Path) -> Result<Option<String>> {
    let output = git_output(repo_path, &["symbolic-ref", "--quiet", "--short", "HEAD"])?;
    if output.status.success() {
        return Ok(Some(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
        ));
    }
    // --quiet makes exit code 1 mean "HEAD is not a symbolic ref"
    if output.status.code() == Some(1) {
        return Ok(None);
    }
    anyhow::bail!(
        "git symbolic-ref HEAD failed: {}",
        String::from_utf8_lossy(&output.stderr).trim()
    )
}

/// URL of the first configured remote, or an empty string without remotes.
pub fn first_remote_url(repo_path: &Path) -> Result<String> {
    let remotes = git_stdout(repo_path, &["remote"])?;
    let Some(remote) = remotes.lines().map(str::trim).find(|r| !r.is_empty()) else {
        return Ok(String::new());
    };
    git_stdout(repo_path, &["remote", "get-url", remote])
}

pub fn is_bare(repo_path: &Path) -> Result<bool> {
    Ok(git_stdout(repo_path, &["rev-parse", "--is-bare-repository"])? == "true")
}

/// Commit a local branch points at, if the branch exists.
fn branch_tip(repo_path: &Path, branch: &str) -> Option<String> {
    let rev = format!("refs/heads/{branch}^{{commit}}");
    git_stdout(repo_path, &["rev-parse", "--verify", "--quiet", &rev]).ok()
}

/// Read the identity (name, remote URL, branch, commit) of a repository.
pub fn inspect(repo_root: &Path) -> Result<RepositoryIdentity, InspectionError> {
    let failed = |e: anyhow::Error| InspectionError::Failed {
        path: repo_root.to_path_buf(),
        cause: format!("{e:#}"),
    };

    // Without a marker, git would silently pick up an enclosing repository
    if !has_git_marker(repo_root) {
        return Err(failed(anyhow::anyhow!("not a git repository")));
    }

    let commit = head_commit(repo_root).map_err(failed)?;
    let branch = current_branch(repo_root)
        .map_err(failed)?
        .ok_or_else(|| InspectionError::DetachedHead {
            path: repo_root.to_path_buf(),
        })?;
    let url = first_remote_url(repo_root).map_err(failed)?;

    Ok(RepositoryIdentity {
        name: repo_name(repo_root),
        url,
        branch,
        commit,
    })
}

/// Check out a recorded target.
///
/// If the recorded branch still points at the recorded commit, the branch is
/// checked out; otherwise HEAD is detached at the commit. Branch pointers are
/// never moved. Returns the ref that was checked out.
pub fn checkout(repo_path: &Path, target: &RestoreTarget) -> Result<String, CheckoutError> {
    let error = |cause: String| CheckoutError {
        path: repo_path.to_path_buf(),
        commit: target.commit.clone(),
        cause,
    };

    if target.commit.is_empty() {
        return Err(error("no commit recorded".to_string()));
    }

    let on_branch = !target.branch.is_empty()
        && branch_tip(repo_path, &target.branch).as_deref() == Some(target.commit.as_str());

    let args: Vec<&str> = if on_branch {
        vec!["checkout", "--quiet", &target.branch, "--"]
    } else {
        vec!["checkout", "--quiet", "--detach", &target.commit, "--"]
    };

    let output = git_output(repo_path, &args).map_err(|e| error(format!("{e:#}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("did not match any") || stderr.contains("not a commit") {
            return Err(error(
                "commit not present locally (fetch it first)".to_string(),
            ));
        }
        return Err(error(stderr.trim().to_string()));
    }

    Ok(if on_branch {
        target.branch.clone()
    } else {
        target.commit.clone()
    })
}
