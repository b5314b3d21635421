//! Listener configuration
//!
//! Loaded once at startup from a TOML file. A missing file is not an error:
//! defaults are generated and persisted. Legacy files that predate the
//! per-event alert toggles are migrated in place at load time.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ListenerError, Result};
use crate::events::EventKind;

/// A branch specification: one pattern or a list of patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BranchSpec {
    One(String),
    Many(Vec<String>),
}

impl Default for BranchSpec {
    fn default() -> Self {
        BranchSpec::One("master".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ListenerConfig {
    /// Port the webhook listener binds to.
    pub port: u16,
    /// HTTP path the webhook route is mounted at.
    pub path: String,
    /// Shared secret for signature verification; empty disables verification.
    pub secret: String,
    /// Repository name updates are accepted for.
    pub repository: String,
    /// Branch patterns that allow an auto-update.
    pub branch: BranchSpec,
    /// Whether push events may trigger a self-update at all.
    pub auto_update: bool,
    /// File whose modification forces a full restart instead of a reload.
    pub hot_file: String,
    /// Dependency install command, run at the repo root and in sub-projects.
    pub install_command: String,
    pub enabled: bool,
    /// Per-event alert toggles. Absent in legacy files; back-filled at load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<HashMap<EventKind, bool>>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            port: 8099,
            path: "/github/callback".to_string(),
            secret: String::new(),
            repository: String::new(),
            branch: BranchSpec::default(),
            auto_update: false,
            hot_file: "main.js".to_string(),
            install_command: "npm install".to_string(),
            enabled: true,
            events: None,
        }
    }
}

fn all_events_enabled() -> HashMap<EventKind, bool> {
    EventKind::ALL.iter().map(|kind| (*kind, true)).collect()
}

impl ListenerConfig {
    /// Back-fills the `events` map on configs that predate it.
    /// Returns true if the config was changed and should be re-persisted.
    pub fn migrate(&mut self) -> bool {
        if self.events.is_none() {
            self.events = Some(all_events_enabled());
            true
        } else {
            false
        }
    }

    /// Whether alerts for `kind` should be delivered. An absent map means
    /// all events are enabled (legacy behavior before migration runs).
    pub fn event_enabled(&self, kind: EventKind) -> bool {
        match &self.events {
            Some(map) => map.get(&kind).copied().unwrap_or(false),
            None => true,
        }
    }

    /// Loads the config from `path`, creating it with defaults if absent.
    /// Migration runs at load; a migrated config is written back.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let raw = fs::read_to_string(path).map_err(|e| {
                ListenerError::ConfigError(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let mut config: ListenerConfig = toml::from_str(&raw).map_err(|e| {
                ListenerError::ConfigError(format!(
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            if config.migrate() {
                info!("Back-filled event toggles in '{}'", path.display());
                config.persist(path)?;
            }
            Ok(config)
        } else {
            let mut config = ListenerConfig::default();
            config.migrate();
            config.persist(path)?;
            info!("Wrote default config to '{}'", path.display());
            Ok(config)
        }
    }

    pub fn persist(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}
