//! Error types for the game core.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Caller supplied an out-of-range or missing parameter.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An orbit-slot or coordinate/name/color uniqueness rule would be broken.
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of entity that was looked up ("game", "empire", ...).
        kind: &'static str,
        id: u64,
    },

    /// A finite pool (color palette, fallback attempts) ran dry.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GameError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::ConstraintViolation(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<u64>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<ron::error::SpannedError> for GameError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(format!("failed to read config file: {err}"))
    }
}
