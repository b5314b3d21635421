use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{routing, Router};
use chrono::Utc;
use github_listener::config::ListenerConfig;
use github_listener::handlers::{handle_webhook, root, status};
use github_listener::host::{LogMessenger, StandaloneControl};
use github_listener::{logging, AppState};
use tokio::sync::Mutex;
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = "github-listener.toml";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config_path =
        std::env::var("GITHUB_LISTENER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let log_directory = std::env::var("GITHUB_LISTENER_LOGS").ok();
    let _log_guard = logging::init(log_directory.as_deref().map(Path::new));

    let config = match ListenerConfig::load_or_create(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if !config.enabled {
        warn!("Listener is disabled in '{}'; deliveries will be ignored", config_path);
    }

    let repo_path = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let webhook_path = config.path.clone();
    let bind_address = format!("0.0.0.0:{}", config.port);

    let state = Arc::new(AppState {
        config,
        repo_path,
        update_lock: Mutex::new(()),
        messenger: Arc::new(LogMessenger),
        control: Arc::new(StandaloneControl),
        start_time: Instant::now(),
        started_at: Utc::now(),
    });

    let app = Router::new()
        .route("/", routing::get(root))
        .route("/status", routing::get(status))
        .route(&webhook_path, routing::post(handle_webhook))
        .with_state(state);

    info!("Listening on {}", bind_address);
    info!("Webhook mounted at {}", webhook_path);
    info!("Using config at {:?}", config_path);
    let listener = tokio::net::TcpListener::bind(bind_address).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

/// Resolves on ctrl-c so the listener releases its port before exiting.
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Stopping webhook listener");
}
