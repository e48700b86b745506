//! Plugin error types.

use thiserror::Error;

/// Hook-related errors.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A hook could not run its action.
    #[error("plugin execution failed: {0}")]
    ExecutionFailed(String),

    /// The context lacks something the hook needs.
    #[error("plugin configuration error: {0}")]
    ConfigError(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;
