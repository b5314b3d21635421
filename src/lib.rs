pub mod classify;
pub mod config;
pub mod deploy;
pub mod error;
pub mod events;
pub mod format;
pub mod handlers;
pub mod host;
pub mod logging;
pub mod pattern;
pub mod policy;
pub mod signature;
pub mod vcs;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::config::ListenerConfig;
use crate::host::{Messenger, ProcessControl};

pub struct AppState {
    pub config: ListenerConfig,
    /// Root of the working tree the listener updates (the application root).
    pub repo_path: PathBuf,
    /// Serializes deployments; only one update runs at a time.
    pub update_lock: Mutex<()>,
    pub messenger: Arc<dyn Messenger>,
    pub control: Arc<dyn ProcessControl>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;
