//! Styled terminal output for the command-line tool.

use console::style;
use std::path::Path;

use crate::restore::RestoreEvent;
use crate::types::{CaptureSummary, RestoreOutcome, RestoreReport, StatusReport, SyncState};

/// First eight characters of a commit hash, or the whole string if shorter.
pub fn short_commit(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

pub fn print_capture_summary(summary: &CaptureSummary, anchor_root: &Path) {
    println!(
        "Updated {} in {}",
        style(summary.snapshot_path.display()).dim(),
        anchor_root.display()
    );
    println!(
        "  {} repositories recorded{}",
        summary.recorded,
        if summary.skipped > 0 {
            format!(", {} skipped", style(summary.skipped).yellow())
        } else {
            String::new()
        }
    );
    if summary.anchor.is_none() {
        println!(
            "  {}",
            style("Anchor repository could not be inspected; restore will refuse this snapshot.")
                .yellow()
        );
    }
}

/// Print one progress line per restore event.
pub fn print_restore_event(event: &RestoreEvent<'_>, dry_run: bool) {
    match event {
        RestoreEvent::Started { path, commit, .. } => {
            let verb = if dry_run { "Would check out" } else { "Checking out" };
            println!(
                "{verb} {} to commit {}...",
                path.display(),
                style(commit).dim()
            );
        }
        RestoreEvent::Finished(entry) => match entry.outcome {
            RestoreOutcome::CheckedOut => {
                let commit = entry.commit.as_deref().unwrap_or_default();
                println!(
                    "{} {} checked out to {}{}",
                    style("✓").green(),
                    entry.path.display(),
                    short_commit(commit),
                    entry
                        .message
                        .as_deref()
                        .map(|m| format!(" ({m})"))
                        .unwrap_or_default()
                );
            }
            RestoreOutcome::WouldCheckOut => {}
            RestoreOutcome::NotInSnapshot => {
                println!(
                    "{} {}: not recorded in snapshot, skipping",
                    style("-").yellow(),
                    entry.path.display()
                );
            }
            RestoreOutcome::InvalidRepository => {
                println!(
                    "{} {}: invalid or bare repository, skipping",
                    style("-").yellow(),
                    entry.path.display()
                );
            }
            RestoreOutcome::Failed => {
                println!(
                    "{} Failed to check out {}: {}",
                    style("✗").red(),
                    entry.path.display(),
                    entry.message.as_deref().unwrap_or("unknown error")
                );
            }
        },
    }
}

pub fn print_restore_summary(report: &RestoreReport, dry_run: bool) {
    let done = if dry_run {
        report.count(RestoreOutcome::WouldCheckOut)
    } else {
        report.count(RestoreOutcome::CheckedOut)
    };
    let failed = report.count(RestoreOutcome::Failed);
    let skipped = report.count(RestoreOutcome::NotInSnapshot)
        + report.count(RestoreOutcome::InvalidRepository);

    let label = if dry_run { "would be checked out" } else { "checked out" };
    let mut line = format!("{done} {label}");
    if failed > 0 {
        line.push_str(&format!(", {}", style(format!("{failed} failed")).red()));
    }
    if skipped > 0 {
        line.push_str(&format!(", {skipped} skipped"));
    }
    println!("{line}");
}

pub fn print_status(report: &StatusReport) {
    for entry in &report.entries {
        let recorded = entry.recorded.as_deref().map(short_commit).unwrap_or("-");
        let current = entry.current.as_deref().map(short_commit).unwrap_or("-");
        let state = match entry.state {
            SyncState::InSync => style("in sync").green(),
            SyncState::Drifted => style("drifted").red(),
            SyncState::Untracked => style("untracked").yellow(),
            SyncState::Unreadable => style("unreadable").red(),
        };
        println!(
            "{:<24} {:<10} {:<10} {}",
            entry.name, recorded, current, state
        );
    }
}
