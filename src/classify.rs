//! Change classification for push events
//!
//! Given the commits of a push and the repository's current branch, decides
//! whether an update should run at all, and if so whether it needs a full
//! process restart and/or a dependency reinstall.

use std::path::Path;

use crate::events::Commit;

/// Dependency manifest; touching one anywhere in the tree forces a reinstall.
pub const MANIFEST_FILE: &str = "package.json";

/// Outcome of classifying one push event. Recomputed per event, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateDecision {
    pub should_update: bool,
    pub shutdown_required: bool,
    pub reinstall_required: bool,
}

/// Classifies a push. `hot_file` is the path whose modification forces a
/// full restart rather than a soft reload.
pub fn classify(
    observed_branch: &str,
    current_branch: &str,
    commits: &[Commit],
    auto_update: bool,
    hot_file: &str,
) -> UpdateDecision {
    let changing_branch = observed_branch != current_branch;

    if !auto_update || (commits.is_empty() && !changing_branch) {
        return UpdateDecision::default();
    }

    // Switching branches invalidates everything we know about the working
    // tree, so both flags start raised.
    let mut decision = UpdateDecision {
        should_update: true,
        shutdown_required: changing_branch,
        reinstall_required: changing_branch,
    };

    for commit in commits {
        for path in &commit.modified {
            inspect(path, hot_file, &mut decision);
        }
        // Created entries are checked by index against the modified list;
        // kept as-is so newly added files never raise flags on their own.
        for i in 0..commit.created.len() {
            if let Some(path) = commit.modified.get(i) {
                inspect(path, hot_file, &mut decision);
            }
        }
    }

    decision
}

fn inspect(path: &str, hot_file: &str, decision: &mut UpdateDecision) {
    if path == hot_file {
        decision.shutdown_required = true;
    }
    if Path::new(path).file_name().and_then(|n| n.to_str()) == Some(MANIFEST_FILE) {
        decision.reinstall_required = true;
    }
}
