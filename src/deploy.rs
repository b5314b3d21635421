//! Deployment executor
//!
//! Runs the actual self-update once policy and classification have decided
//! one is warranted: fetch, checkout/reset to the target branch, optional
//! dependency reinstall (root plus concurrent sub-project installs), then
//! shutdown or reload via the host's process control.

use std::path::{Path, PathBuf};

use glob::glob;
use tokio::process::Command;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::classify::UpdateDecision;
use crate::error::{ListenerError, Result};
use crate::host::ProcessControl;
use crate::vcs;

/// Manifests marking sub-projects that need their own dependency install.
const SUBPROJECT_MANIFEST_GLOB: &str = "plugins/*/plugin.json";

/// Shown in chat when an update forces a full restart.
pub const FAREWELL: &str = "Going down for an update. Be right back!";

pub struct Deployer {
    repo_path: PathBuf,
    install_command: String,
}

impl Deployer {
    pub fn new(repo_path: PathBuf, install_command: String) -> Self {
        Self {
            repo_path,
            install_command,
        }
    }

    /// Applies one update. Any failed step aborts the whole attempt; there
    /// is no rollback. An environment without git or a working tree is not
    /// an error, the update is just skipped.
    pub async fn handle(
        &self,
        target_branch: &str,
        decision: UpdateDecision,
        control: &dyn ProcessControl,
    ) -> Result<()> {
        if !vcs::is_repository(&self.repo_path).await {
            debug!(
                "Skipping update: git unavailable or '{}' is not a repository",
                self.repo_path.display()
            );
            return Ok(());
        }

        vcs::fetch(&self.repo_path).await?;

        let current = vcs::current_branch(&self.repo_path).await;
        // Only hard-reset when HEAD started on a known branch or tag; a
        // detached unknown state is left alone.
        let on_known_ref =
            current.is_some() || vcs::current_tag(&self.repo_path).await.is_some();

        if current.as_deref() != Some(target_branch) {
            vcs::checkout(&self.repo_path, target_branch).await?;
        }

        if on_known_ref {
            vcs::reset_hard(&self.repo_path, target_branch).await?;
            if let Some(commit) = vcs::current_commit(&self.repo_path).await {
                info!("Working tree now at {}", commit);
            }
        }

        if decision.reinstall_required {
            run_install(&self.repo_path, &self.install_command).await?;
            self.install_subprojects().await;
        }

        if decision.shutdown_required {
            control.shutdown(FAREWELL);
        } else {
            control.reload();
        }
        Ok(())
    }

    /// Runs the install command in every discovered sub-project directory,
    /// one task per directory, and waits for all of them. Failures are
    /// logged after the join but never fail the update.
    async fn install_subprojects(&self) {
        let pattern = self.repo_path.join(SUBPROJECT_MANIFEST_GLOB);
        let entries = match glob(&pattern.to_string_lossy()) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Sub-project discovery failed, skipping installs: {}", e);
                return;
            }
        };

        let mut installs = JoinSet::new();
        for entry in entries {
            let manifest = match entry {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!("Skipping unreadable sub-project entry: {}", e);
                    continue;
                }
            };
            let Some(dir) = manifest.parent().map(Path::to_path_buf) else {
                continue;
            };
            let command = self.install_command.clone();
            installs.spawn(async move {
                let result = run_install(&dir, &command).await;
                (dir, result)
            });
        }

        while let Some(joined) = installs.join_next().await {
            match joined {
                Ok((dir, Err(e))) => {
                    warn!("Sub-project install failed in '{}': {}", dir.display(), e)
                }
                Ok((dir, Ok(()))) => {
                    debug!("Sub-project install finished in '{}'", dir.display())
                }
                Err(e) => warn!("Sub-project install task panicked: {}", e),
            }
        }
    }
}

/// Runs the dependency install command with `dir` as the working directory.
async fn run_install(dir: &Path, install_command: &str) -> Result<()> {
    let mut parts = install_command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| ListenerError::InstallFailed("install command is empty".to_string()))?;
    let args: Vec<&str> = parts.collect();

    info!("Running (cwd = '{}'): {}", dir.display(), install_command);
    let output = Command::new(program)
        .current_dir(dir)
        .args(&args)
        .output()
        .await
        .map_err(|e| {
            error!("install command failed to start: {}", e);
            ListenerError::InstallFailed(format!("failed to start: {}", e))
        })?;

    if !output.status.success() {
        let message = String::from_utf8_lossy(&output.stderr).to_string();
        error!("install command failed: {}", message);
        return Err(ListenerError::InstallFailed(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct RecordingControl {
        shutdown: AtomicBool,
        reload: AtomicBool,
    }

    impl ProcessControl for RecordingControl {
        fn shutdown(&self, _reason: &str) {
            self.shutdown.store(true, Ordering::SeqCst);
        }

        fn reload(&self) {
            self.reload.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn missing_repository_aborts_silently() {
        let dir = tempfile::tempdir().unwrap();
        let deployer = Deployer::new(dir.path().to_path_buf(), "npm install".to_string());
        let control = RecordingControl::default();

        let decision = UpdateDecision {
            should_update: true,
            shutdown_required: true,
            reinstall_required: true,
        };
        deployer
            .handle("master", decision, &control)
            .await
            .unwrap();

        // Neither lifecycle hook fires when the precondition fails.
        assert!(!control.shutdown.load(Ordering::SeqCst));
        assert!(!control.reload.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_install_command_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_install(dir.path(), "  ").await.unwrap_err();
        assert!(matches!(err, ListenerError::InstallFailed(_)));
    }

    #[tokio::test]
    async fn failing_install_command_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_install(dir.path(), "git log").await;
        assert!(result.is_err());
    }
}
