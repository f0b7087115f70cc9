/// Core error types for the Kinema interpreter.

/// A specialized Result type for Kinema operations.
pub type KinemaResult<T> = Result<T, KinemaError>;

/// Top-level error type encompassing all Kinema pipeline stages.
#[derive(Debug, thiserror::Error)]
pub enum KinemaError {
    /// The scene document could not be read or decoded. The only fatal
    /// class: the CLI maps it to a non-zero exit.
    #[error("load error: {0}")]
    Load(String),

    #[error("expression error: {0}")]
    Expr(String),

    /// The engine rejected a play/wait call.
    #[error("playback error: {0}")]
    Play(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl KinemaError {
    /// Create a load error.
    pub fn load(message: impl Into<String>) -> Self {
        KinemaError::Load(message.into())
    }

    /// Create an expression error.
    pub fn expr(message: impl Into<String>) -> Self {
        KinemaError::Expr(message.into())
    }
}
