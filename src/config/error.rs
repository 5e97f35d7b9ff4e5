//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    #[error("WebSocket path must be absolute: '{0}'")]
    InvalidWsPath(String),

    #[error("Maximum frame size must be positive")]
    InvalidFrameSize,

    #[error("Maximum message length must be positive")]
    InvalidTextLimit,

    #[error("Outbound queue capacity must be positive")]
    InvalidQueueCapacity,
}
