//! Error taxonomy for pet operations

/// Errors raised by the game engines and the service layer.
///
/// "Nothing to do" outcomes (login bonus already taken today, chest not
/// ready yet) are not errors; those operations return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("not eligible: {0}")]
    NotEligible(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GameError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// True for errors caused by the caller rather than the backend.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Serialization(_))
    }
}

pub type GameResult<T> = std::result::Result<T, GameError>;
