//! Hint providers behind the AI-support lifeline.
//!
//! The session depends only on [`HintProvider`]. A live provider may fail or be
//! unconfigured; the session then falls back to [`fallback_hint`], which is local,
//! synchronous and deterministic.

mod gemini;
mod local;

use async_trait::async_trait;

use quiz_core::model::{OPTION_COUNT, QuestionRecord};

use crate::error::HintError;

pub use gemini::{GeminiHintProvider, HintConfig};
pub use local::{LocalHintProvider, fallback_hint, first_sentence};

/// Everything a provider may look at to produce a hint.
#[derive(Debug, Clone, Copy)]
pub struct HintRequest<'a> {
    pub question: &'a str,
    pub options: &'a [String; OPTION_COUNT],
    pub explanation: &'a str,
}

impl<'a> HintRequest<'a> {
    #[must_use]
    pub fn for_question(record: &'a QuestionRecord) -> Self {
        Self {
            question: record.question(),
            options: record.options(),
            explanation: record.explanation(),
        }
    }
}

/// Capability: turn a question and its explanation into a short hint.
#[async_trait]
pub trait HintProvider: Send + Sync {
    /// Short name used in logs and hint metadata.
    fn name(&self) -> &'static str;

    /// Produce the player-facing hint text.
    ///
    /// # Errors
    ///
    /// Returns `HintError` when the provider is unavailable or its request fails.
    async fn hint(&self, request: &HintRequest<'_>) -> Result<String, HintError>;
}

/// Why the session used the local fallback instead of the provider's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Failed(String),
    TimedOut,
}

/// Where a delivered hint came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintSource {
    Provider(&'static str),
    Fallback(FallbackReason),
}

/// Hint delivered to the player by the AI-support lifeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub text: String,
    pub source: HintSource,
}

impl Hint {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, HintSource::Fallback(_))
    }
}
