//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{Level, Lifeline, OptionPosition, SessionId};
use storage::repository::StorageError;

/// Errors raised while loading the question bank. Fatal at startup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionStoreError {
    #[error("question source holds no questions")]
    Empty,
    #[error("question #{index} has level {level}, above the maximum of {max}")]
    LevelOutOfRange { index: usize, level: Level, max: Level },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the game session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("no question available for level {level}")]
    NoQuestionAvailable { level: Level },
    #[error("{} has already been used", .0.label())]
    AlreadyUsed(Lifeline),
    #[error("invalid answer position: {0} (expected 1-4)")]
    InvalidPosition(u32),
    #[error("no active question")]
    NoActiveQuestion,
    #[error("option {} was removed by 50/50", .0.letter())]
    OptionRemoved(OptionPosition),
}

impl GameError {
    /// True for rejected input or calls made without an active question.
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            GameError::InvalidPosition(_) | GameError::NoActiveQuestion | GameError::OptionRemoved(_)
        )
    }
}

/// Errors emitted by hint providers. Never surfaced past the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HintError {
    #[error("hint provider is not configured")]
    Disabled,
    #[error("hint provider returned an empty response")]
    EmptyResponse,
    #[error("hint request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `GameService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("session {0} is already finished")]
    Finished(SessionId),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Invalid game settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("max level must be at least 1")]
    InvalidMaxLevel,
    #[error("hint timeout must be greater than zero")]
    InvalidHintTimeout,
    #[error("session ttl must be greater than zero")]
    InvalidSessionTtl,
    #[error("invalid value for {var}: {raw}")]
    InvalidEnv { var: &'static str, raw: String },
}
