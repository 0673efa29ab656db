#![forbid(unsafe_code)]

pub mod error;
pub mod hints;
pub mod question_store;
pub mod sessions;
pub mod settings;

pub use quiz_core::Clock;

pub use error::{GameError, HintError, QuestionStoreError, SessionError, SettingsError};
pub use hints::{
    FallbackReason, GeminiHintProvider, Hint, HintConfig, HintProvider, HintRequest, HintSource,
    LocalHintProvider,
};
pub use question_store::QuestionStore;
pub use settings::GameSettings;

pub use sessions::{AnswerOutcome, GameService, GameSession, PublicState, SupportOutcome, Supports};
