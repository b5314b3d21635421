//! Thin wrappers over the `git` binary.
//!
//! Success is determined by exit code only; stderr is captured purely for
//! log messages. Probes return `Option` so callers can treat "no git" and
//! "not a repository" the same way.

use std::path::Path;

use tokio::process::Command;
use tracing::{error, info};

use crate::error::{ListenerError, Result};

/// Runs `git <args>` in `repo_path`, failing on spawn error or non-zero exit.
async fn run_git(repo_path: &Path, args: &[&str], operation: &str) -> Result<()> {
    info!("Running (cwd = '{}'): git {}", repo_path.display(), args.join(" "));
    let output = Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .await
        .map_err(|e| {
            error!("git {} failed to start: {}", operation, e);
            ListenerError::GitOperationFailed {
                operation: operation.to_string(),
                message: format!("failed to start: {}", e),
            }
        })?;

    if !output.status.success() {
        let message = String::from_utf8_lossy(&output.stderr).to_string();
        error!("git {} failed: {}", operation, message);
        return Err(ListenerError::GitOperationFailed {
            operation: operation.to_string(),
            message,
        });
    }
    Ok(())
}

/// Runs a read-only git query, returning trimmed stdout on success.
async fn probe(repo_path: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// True if `git` can run and `repo_path` is inside a working tree.
pub async fn is_repository(repo_path: &Path) -> bool {
    probe(repo_path, &["rev-parse", "--is-inside-work-tree"])
        .await
        .as_deref()
        == Some("true")
}

/// The checked-out branch name, or None when detached or unavailable.
pub async fn current_branch(repo_path: &Path) -> Option<String> {
    probe(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])
        .await
        .filter(|name| name != "HEAD")
}

pub async fn current_commit(repo_path: &Path) -> Option<String> {
    probe(repo_path, &["rev-parse", "HEAD"]).await
}

/// The tag pointing at HEAD, if any.
pub async fn current_tag(repo_path: &Path) -> Option<String> {
    probe(repo_path, &["describe", "--tags", "--exact-match"]).await
}

pub async fn fetch(repo_path: &Path) -> Result<()> {
    run_git(repo_path, &["fetch"], "fetch").await
}

pub async fn checkout(repo_path: &Path, branch: &str) -> Result<()> {
    run_git(repo_path, &["checkout", "-q", branch], "checkout").await
}

pub async fn reset_hard(repo_path: &Path, branch: &str) -> Result<()> {
    let target = format!("origin/{}", branch);
    run_git(repo_path, &["reset", "-q", &target, "--hard"], "reset").await
}
