use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;
use rand::seq::IndexedRandom;

use quiz_core::model::{Level, Lifeline, OptionPosition, QuestionRecord};

use super::view::{PublicState, Supports};
use crate::error::GameError;
use crate::hints::{FallbackReason, Hint, HintProvider, HintRequest, HintSource, fallback_hint};
use crate::question_store::QuestionStore;
use crate::settings::GameSettings;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct answer at the last level. The game is decided.
    Won { correct: OptionPosition },
    /// Correct answer below the last level; `state` shows the next question.
    Correct {
        correct: OptionPosition,
        state: PublicState,
    },
    /// Wrong answer. The game is decided and the explanation may now be shown.
    Lost {
        correct: OptionPosition,
        submitted: OptionPosition,
        explanation: String,
    },
}

impl AnswerOutcome {
    /// True for `Won` and `Lost`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnswerOutcome::Correct { .. })
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One player's game: level, current question, removed options and lifeline flags.
///
/// Every mutation goes through the methods below. A call that returns an error
/// leaves the session exactly as it was, except `start`, which always resets first.
/// Randomness (question draws, 50/50 picks) comes from the injected RNG.
pub struct GameSession {
    store: Arc<QuestionStore>,
    hints: Arc<dyn HintProvider>,
    max_level: Level,
    hint_timeout: Duration,
    rng: Box<dyn RngCore + Send>,
    level: Level,
    current: Option<Arc<QuestionRecord>>,
    removed: BTreeSet<OptionPosition>,
    used_fifty_fifty: bool,
    used_change_question: bool,
    used_ai_support: bool,
}

impl GameSession {
    /// Create a session awaiting its first question. Call [`GameSession::start`] next.
    #[must_use]
    pub fn new(
        store: Arc<QuestionStore>,
        hints: Arc<dyn HintProvider>,
        settings: &GameSettings,
        rng: impl RngCore + Send + 'static,
    ) -> Self {
        Self {
            store,
            hints,
            max_level: settings.max_level(),
            hint_timeout: settings.hint_timeout(),
            rng: Box::new(rng),
            level: Level::FIRST,
            current: None,
            removed: BTreeSet::new(),
            used_fifty_fifty: false,
            used_change_question: false,
            used_ai_support: false,
        }
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn max_level(&self) -> Level {
        self.max_level
    }

    /// The active question, including its answer. Server-side use only.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn removed_options(&self) -> Vec<OptionPosition> {
        self.removed.iter().copied().collect()
    }

    #[must_use]
    pub fn is_used(&self, lifeline: Lifeline) -> bool {
        match lifeline {
            Lifeline::FiftyFifty => self.used_fifty_fifty,
            Lifeline::ChangeQuestion => self.used_change_question,
            Lifeline::AiSupport => self.used_ai_support,
        }
    }

    #[must_use]
    pub fn supports(&self) -> Supports {
        Supports {
            fifty_fifty: !self.used_fifty_fifty,
            change_question: !self.used_change_question,
            ai_support: !self.used_ai_support,
        }
    }

    /// Public projection of the session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveQuestion` before the first question is drawn.
    pub fn state(&self) -> Result<PublicState, GameError> {
        let question = self.active()?;
        Ok(PublicState {
            level: self.level.value(),
            question: question.question().to_owned(),
            options: question.options().clone(),
            removed_options: self.removed_options(),
            supports: self.supports(),
        })
    }

    /// Reset to level 1 with all lifelines available and draw the first question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoQuestionAvailable` if level 1 has no questions; the
    /// session is then left reset but without a question.
    pub fn start(&mut self) -> Result<PublicState, GameError> {
        self.level = Level::FIRST;
        self.current = None;
        self.removed.clear();
        self.used_fifty_fifty = false;
        self.used_change_question = false;
        self.used_ai_support = false;

        let question = self.draw(Level::FIRST)?;
        self.current = Some(question);
        self.state()
    }

    /// Check `position` (1-4) against the active question.
    ///
    /// # Errors
    ///
    /// - `GameError::InvalidPosition` for a position outside 1-4.
    /// - `GameError::NoActiveQuestion` before the first draw.
    /// - `GameError::OptionRemoved` for a position hidden by 50/50.
    /// - `GameError::NoQuestionAvailable` if the next level has no questions.
    pub fn submit_answer(&mut self, position: u32) -> Result<AnswerOutcome, GameError> {
        let submitted =
            OptionPosition::new(position).map_err(|_| GameError::InvalidPosition(position))?;
        let question = Arc::clone(self.active()?);
        if self.removed.contains(&submitted) {
            return Err(GameError::OptionRemoved(submitted));
        }

        let correct = question.correct();
        if !question.is_correct(submitted) {
            return Ok(AnswerOutcome::Lost {
                correct,
                submitted,
                explanation: question.explanation().to_owned(),
            });
        }

        if self.level >= self.max_level {
            return Ok(AnswerOutcome::Won { correct });
        }

        let next_level = self.level.next();
        let next = self.draw(next_level)?;
        self.level = next_level;
        self.current = Some(next);
        self.removed.clear();

        Ok(AnswerOutcome::Correct {
            correct,
            state: self.state()?,
        })
    }

    /// Hide two of the three wrong options. Returns the hidden positions in order.
    ///
    /// # Errors
    ///
    /// Returns `GameError::AlreadyUsed` on a second call, or
    /// `GameError::NoActiveQuestion` before the first draw.
    pub fn use_fifty_fifty(&mut self) -> Result<Vec<OptionPosition>, GameError> {
        if self.used_fifty_fifty {
            return Err(GameError::AlreadyUsed(Lifeline::FiftyFifty));
        }
        let question = Arc::clone(self.active()?);

        let wrong = question.wrong_positions();
        let picked: BTreeSet<OptionPosition> = wrong
            .choose_multiple(self.rng.as_mut(), 2)
            .copied()
            .collect();

        self.used_fifty_fifty = true;
        self.removed = picked;
        Ok(self.removed_options())
    }

    /// Swap the active question for a fresh draw at the same level.
    ///
    /// The draw may return the same question again.
    ///
    /// # Errors
    ///
    /// Returns `GameError::AlreadyUsed`, `GameError::NoActiveQuestion`, or
    /// `GameError::NoQuestionAvailable`.
    pub fn use_change_question(&mut self) -> Result<PublicState, GameError> {
        if self.used_change_question {
            return Err(GameError::AlreadyUsed(Lifeline::ChangeQuestion));
        }
        self.active()?;

        let question = self.draw(self.level)?;
        self.used_change_question = true;
        self.current = Some(question);
        self.removed.clear();
        self.state()
    }

    /// Ask the hint provider for help with the active question.
    ///
    /// The provider call is bounded by the configured timeout. Provider errors and
    /// timeouts are absorbed: the hint then comes from [`fallback_hint`].
    ///
    /// # Errors
    ///
    /// Returns `GameError::AlreadyUsed` or `GameError::NoActiveQuestion` only.
    pub async fn use_ai_support(&mut self) -> Result<Hint, GameError> {
        if self.used_ai_support {
            return Err(GameError::AlreadyUsed(Lifeline::AiSupport));
        }
        let question = Arc::clone(self.active()?);
        self.used_ai_support = true;

        let request = HintRequest::for_question(&question);
        let provider = self.hints.name();
        let reply = tokio::time::timeout(self.hint_timeout, self.hints.hint(&request)).await;

        let hint = match reply {
            Ok(Ok(text)) if !text.trim().is_empty() => Hint {
                text,
                source: HintSource::Provider(provider),
            },
            Ok(Ok(_)) => fallback(&question, FallbackReason::Failed("empty hint".into())),
            Ok(Err(err)) => fallback(&question, FallbackReason::Failed(err.to_string())),
            Err(_) => fallback(&question, FallbackReason::TimedOut),
        };
        Ok(hint)
    }

    fn active(&self) -> Result<&Arc<QuestionRecord>, GameError> {
        self.current.as_ref().ok_or(GameError::NoActiveQuestion)
    }

    fn draw(&mut self, level: Level) -> Result<Arc<QuestionRecord>, GameError> {
        self.store
            .select_random(level, self.rng.as_mut())
            .ok_or(GameError::NoQuestionAvailable { level })
    }
}

fn fallback(question: &QuestionRecord, reason: FallbackReason) -> Hint {
    Hint {
        text: fallback_hint(question.explanation()),
        source: HintSource::Fallback(reason),
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("level", &self.level)
            .field("max_level", &self.max_level)
            .field("has_question", &self.current.is_some())
            .field("removed", &self.removed)
            .field("used_fifty_fifty", &self.used_fifty_fifty)
            .field("used_change_question", &self.used_change_question)
            .field("used_ai_support", &self.used_ai_support)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
