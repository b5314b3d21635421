//! Host collaborator interfaces
//!
//! The listener core never talks to a chat protocol or manages the process
//! lifecycle itself; it calls these traits. An embedding bot supplies its
//! own implementations, the standalone binary uses the log-backed ones.

use tracing::info;

/// Outbound chat delivery. Fire-and-forget; no result is observed.
pub trait Messenger: Send + Sync {
    fn send_message(&self, text: &str, is_alert: bool);
}

/// Process lifecycle control of the host bot.
pub trait ProcessControl: Send + Sync {
    /// Full shutdown with a user-facing reason.
    fn shutdown(&self, reason: &str);
    /// Soft in-process reload.
    fn reload(&self);
}

/// Writes alerts to the log instead of a chat channel.
pub struct LogMessenger;

impl Messenger for LogMessenger {
    fn send_message(&self, text: &str, is_alert: bool) {
        info!(alert = is_alert, "{}", text);
    }
}

/// Lifecycle control for the standalone binary: shutdown exits the process
/// (a supervisor is expected to bring it back up), reload is logged for the
/// embedding host to act on.
pub struct StandaloneControl;

impl ProcessControl for StandaloneControl {
    fn shutdown(&self, reason: &str) {
        info!("Shutting down: {}", reason);
        std::process::exit(0);
    }

    fn reload(&self) {
        info!("Reload requested");
    }
}
