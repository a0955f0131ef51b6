use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from vault filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Vault operation failures (create/move) with context.
    #[error("Vault error: {0}")]
    Vault(String),

    /// Panel state (de)serialization errors.
    #[error("State error: {0}")]
    Persist(#[from] serde_json::Error),

    /// Filesystem watcher errors.
    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),
}
