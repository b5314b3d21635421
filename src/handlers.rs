//! HTTP handlers and the inbound-delivery entry point.
//!
//! The axum handler only does transport work (signature check, header
//! parsing, deserialization); everything after that goes through
//! `process_delivery`, which dispatches alerts and, for push events, the
//! auto-update decision.

use axum::{
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{debug, error, info};

use crate::classify::{self, UpdateDecision};
use crate::config::ListenerConfig;
use crate::deploy::Deployer;
use crate::events::{EventKind, PushEvent, WebhookEvent};
use crate::{format, policy, signature, vcs, SharedState};

pub async fn root() -> &'static str {
    "github-listener"
}

/// Returns the current server status.
pub async fn status(AxumState(state): AxumState<SharedState>) -> impl IntoResponse {
    Json(json!({
        "server": {
            "name": "github-listener",
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": state.started_at,
            "uptime_seconds": state.start_time.elapsed().as_secs(),
        },
        "config": {
            "repository": state.config.repository,
            "auto_update": state.config.auto_update,
            "enabled": state.config.enabled,
        }
    }))
}

/// Handles the GitHub webhook POST request.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !state.config.enabled {
        debug!("Listener disabled; ignoring delivery");
        return StatusCode::NO_CONTENT;
    }

    // Signature validation, unless no secret is configured (local setups).
    if !state.config.secret.is_empty() {
        let signature_opt = headers
            .get("X-Hub-Signature-256")
            .and_then(|v| v.to_str().ok());
        let Some(signature_header) = signature_opt else {
            error!("Webhook secret configured, but no signature header supplied");
            return StatusCode::UNAUTHORIZED;
        };
        if !signature::verify(&state.config.secret, &body, signature_header) {
            error!("Signature verification failed");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let kind_opt = headers
        .get("X-GitHub-Event")
        .and_then(|v| v.to_str().ok());
    let Some(kind) = kind_opt.and_then(EventKind::from_header) else {
        info!("Unsupported event; received {:?}", kind_opt);
        return StatusCode::NO_CONTENT;
    };

    let event = match WebhookEvent::parse(kind, &body) {
        Ok(event) => event,
        Err(e) => {
            info!("Could not parse {} payload: {}", kind.as_str(), e);
            return StatusCode::BAD_REQUEST;
        }
    };

    process_delivery(&state, event).await;
    StatusCode::OK
}

/// Single entry point for a parsed delivery: send alerts if the event type
/// is enabled, then run the push auto-update path.
pub async fn process_delivery(state: &SharedState, event: WebhookEvent) {
    if state.config.event_enabled(event.kind()) {
        for message in format::render(&event) {
            state.messenger.send_message(&message, true);
        }
    }

    if let WebhookEvent::Push(push) = event {
        let current = vcs::current_branch(&state.repo_path)
            .await
            .unwrap_or_default();
        if let Some(decision) = decide_update(&state.config, &current, &push) {
            spawn_update(state, push.short_ref().to_string(), decision);
        }
    }
}

/// Decides whether a push warrants a deployment. Returns None when the ref
/// was deleted, the repository or branch does not match, or classification
/// finds nothing to do.
pub fn decide_update(
    config: &ListenerConfig,
    current_branch: &str,
    push: &PushEvent,
) -> Option<UpdateDecision> {
    if push.deleted {
        return None;
    }
    if push.repository.name != config.repository {
        debug!(
            "Push for '{}' does not match configured repository '{}'",
            push.repository.name, config.repository
        );
        return None;
    }

    let branch = push.short_ref();
    if !policy::should_update(branch, &config.branch) {
        debug!("Push to non-matching branch '{}', skipping update", branch);
        return None;
    }

    let decision = classify::classify(
        branch,
        current_branch,
        &push.commits,
        config.auto_update,
        &config.hot_file,
    );
    decision.should_update.then_some(decision)
}

/// Runs the deployment in the background, serialized by the update lock.
fn spawn_update(state: &SharedState, target_branch: String, decision: UpdateDecision) {
    let state = state.clone();
    tokio::spawn(async move {
        let _guard = state.update_lock.lock().await;
        info!(
            "Starting self-update to branch '{}' (shutdown: {}, reinstall: {})",
            target_branch, decision.shutdown_required, decision.reinstall_required
        );
        let deployer = Deployer::new(
            state.repo_path.clone(),
            state.config.install_command.clone(),
        );
        if let Err(e) = deployer
            .handle(&target_branch, decision, state.control.as_ref())
            .await
        {
            error!("Update aborted: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BranchSpec;
    use crate::events::{Commit, CommitAuthor, Pusher, Repository};
    use crate::host::{Messenger, ProcessControl};
    use crate::AppState;
    use chrono::Utc;
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Instant;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingMessenger {
        sent: StdMutex<Vec<(String, bool)>>,
    }

    impl Messenger for RecordingMessenger {
        fn send_message(&self, text: &str, is_alert: bool) {
            self.sent.lock().unwrap().push((text.to_string(), is_alert));
        }
    }

    struct NoopControl;

    impl ProcessControl for NoopControl {
        fn shutdown(&self, _reason: &str) {}
        fn reload(&self) {}
    }

    fn test_config() -> ListenerConfig {
        ListenerConfig {
            repository: "bot".to_string(),
            branch: BranchSpec::Many(vec!["master".to_string(), "release-*".to_string()]),
            auto_update: true,
            ..ListenerConfig::default()
        }
    }

    fn test_state(
        config: ListenerConfig,
        messenger: Arc<RecordingMessenger>,
        repo_path: std::path::PathBuf,
    ) -> SharedState {
        Arc::new(AppState {
            config,
            repo_path,
            update_lock: Mutex::new(()),
            messenger,
            control: Arc::new(NoopControl),
            start_time: Instant::now(),
            started_at: Utc::now(),
        })
    }

    fn push(branch: &str, commits: Vec<Commit>) -> PushEvent {
        PushEvent {
            reference: format!("refs/heads/{}", branch),
            created: false,
            deleted: false,
            forced: false,
            compare: String::new(),
            commits,
            repository: Repository {
                name: "bot".to_string(),
            },
            pusher: Pusher {
                name: "alice".to_string(),
            },
        }
    }

    fn commit(modified: &[&str]) -> Commit {
        Commit {
            id: "0123456789abcdef0123456789abcdef01234567".to_string(),
            message: "change".to_string(),
            author: CommitAuthor::default(),
            created: Vec::new(),
            modified: modified.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn deleted_ref_push_sends_no_alert_and_no_update() {
        let messenger = Arc::new(RecordingMessenger::default());
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(test_config(), messenger.clone(), dir.path().to_path_buf());

        let mut event = push("master", vec![commit(&["main.js"])]);
        event.deleted = true;

        assert!(decide_update(&state.config, "master", &event).is_none());
        process_delivery(&state, WebhookEvent::Push(event)).await;
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn non_matching_branch_never_deploys() {
        let config = test_config();
        let event = push("hotfix", vec![commit(&["main.js"])]);
        assert!(decide_update(&config, "master", &event).is_none());
    }

    #[test]
    fn non_matching_repository_never_deploys() {
        let config = test_config();
        let mut event = push("master", vec![commit(&["main.js"])]);
        event.repository.name = "other".to_string();
        assert!(decide_update(&config, "master", &event).is_none());
    }

    #[test]
    fn plain_file_touch_yields_reload_without_reinstall() {
        let config = test_config();
        let event = push("master", vec![commit(&["lib/helpers.js"])]);
        let decision = decide_update(&config, "master", &event).unwrap();
        assert!(decision.should_update);
        assert!(!decision.shutdown_required);
        assert!(!decision.reinstall_required);
    }

    #[test]
    fn wildcard_branch_spec_applies() {
        let config = test_config();
        let event = push("release-2", vec![commit(&["lib/helpers.js"])]);
        let decision = decide_update(&config, "release-2", &event).unwrap();
        assert!(decision.should_update);
    }

    #[tokio::test]
    async fn enabled_event_is_alerted() {
        let messenger = Arc::new(RecordingMessenger::default());
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        // Keep the update path quiet for this test.
        config.auto_update = false;
        let state = test_state(config, messenger.clone(), dir.path().to_path_buf());

        let event = push("master", vec![commit(&["lib/helpers.js"])]);
        process_delivery(&state, WebhookEvent::Push(event)).await;

        let sent = messenger.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].0.contains("1 commit pushed to branch bot:master by alice."));
        assert!(sent[0].1, "alerts are tagged as alerts");
    }

    #[tokio::test]
    async fn disabled_event_type_is_silent() {
        let messenger = Arc::new(RecordingMessenger::default());
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config();
        config.auto_update = false;
        config.migrate();
        config
            .events
            .as_mut()
            .unwrap()
            .insert(EventKind::Push, false);
        let state = test_state(config, messenger.clone(), dir.path().to_path_buf());

        let event = push("master", vec![commit(&["lib/helpers.js"])]);
        process_delivery(&state, WebhookEvent::Push(event)).await;
        assert!(messenger.sent.lock().unwrap().is_empty());
    }
}
