use std::io;

/// Custom error type for github-listener operations
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Git operation failed: {operation}\n{message}")]
    GitOperationFailed { operation: String, message: String },

    #[error("Dependency install failed: {0}")]
    InstallFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

/// Helper type for Results that use ListenerError
pub type Result<T> = std::result::Result<T, ListenerError>;
