use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use quiz_core::model::{Lifeline, OptionPosition, SessionId};

use super::game::{AnswerOutcome, GameSession};
use super::registry::{SessionEntry, SessionRegistry, SharedEntry};
use super::view::{PublicState, Supports};
use crate::Clock;
use crate::error::SessionError;
use crate::hints::{Hint, HintProvider, HintSource};
use crate::question_store::QuestionStore;
use crate::settings::GameSettings;

/// Result of using a lifeline through the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportOutcome {
    FiftyFifty {
        removed: Vec<OptionPosition>,
        supports: Supports,
    },
    ChangeQuestion {
        state: PublicState,
    },
    AiSupport {
        hint: Hint,
        supports: Supports,
    },
}

/// Session-keyed entry point for front ends.
///
/// Owns the registry of live sessions, hands each new session its own RNG and
/// stops decided games from being played further.
#[derive(Clone)]
pub struct GameService {
    clock: Clock,
    store: Arc<QuestionStore>,
    hints: Arc<dyn HintProvider>,
    settings: GameSettings,
    registry: Arc<SessionRegistry>,
    seed: Option<u64>,
    started: Arc<AtomicU64>,
}

impl GameService {
    #[must_use]
    pub fn new(
        store: Arc<QuestionStore>,
        hints: Arc<dyn HintProvider>,
        settings: GameSettings,
        clock: Clock,
    ) -> Self {
        Self {
            clock,
            store,
            hints,
            settings,
            registry: Arc::new(SessionRegistry::new()),
            seed: None,
            started: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Derive every session RNG from `seed` so whole runs are reproducible.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.registry.len()
    }

    /// Start (or restart) the session `id` and draw its first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Game` with `NoQuestionAvailable` when level 1 has no
    /// questions. The session stays registered without an active question.
    pub async fn start_session(&self, id: SessionId) -> Result<PublicState, SessionError> {
        let mut game = GameSession::new(
            Arc::clone(&self.store),
            Arc::clone(&self.hints),
            &self.settings,
            self.next_rng(),
        );
        let started = game.start();
        let replaced = self
            .registry
            .insert(id, SessionEntry::new(game, self.clock.now()));

        match started {
            Ok(state) => {
                info!(session = %id, restarted = replaced, "session started");
                Ok(state)
            }
            Err(err) => {
                warn!(session = %id, error = %err, "session could not draw a first question");
                Err(err.into())
            }
        }
    }

    /// Submit an answer position (1-4).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound`, `SessionError::Finished` once the game is
    /// decided, or the session's `GameError`.
    pub async fn submit_answer(
        &self,
        id: SessionId,
        position: u32,
    ) -> Result<AnswerOutcome, SessionError> {
        let shared = self.entry(id)?;
        let mut entry = shared.lock().await;
        if entry.finished {
            return Err(SessionError::Finished(id));
        }
        entry.last_active = self.clock.now();

        let level = entry.game.level();
        let outcome = entry.game.submit_answer(position)?;
        match &outcome {
            AnswerOutcome::Won { .. } => {
                entry.finished = true;
                info!(session = %id, level = %level, "game won");
            }
            AnswerOutcome::Lost {
                correct, submitted, ..
            } => {
                entry.finished = true;
                info!(session = %id, level = %level, %correct, %submitted, "game lost");
            }
            AnswerOutcome::Correct { state, .. } => {
                debug!(session = %id, level = state.level, "answer correct");
            }
        }
        Ok(outcome)
    }

    /// Use one of the three lifelines.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound`, `SessionError::Finished`, or the session's
    /// `GameError` (`AlreadyUsed`, `NoActiveQuestion`, `NoQuestionAvailable`).
    pub async fn use_support(
        &self,
        id: SessionId,
        lifeline: Lifeline,
    ) -> Result<SupportOutcome, SessionError> {
        let shared = self.entry(id)?;
        let mut entry = shared.lock().await;
        if entry.finished {
            return Err(SessionError::Finished(id));
        }
        entry.last_active = self.clock.now();

        let outcome = match lifeline {
            Lifeline::FiftyFifty => {
                let removed = entry.game.use_fifty_fifty()?;
                SupportOutcome::FiftyFifty {
                    removed,
                    supports: entry.game.supports(),
                }
            }
            Lifeline::ChangeQuestion => SupportOutcome::ChangeQuestion {
                state: entry.game.use_change_question()?,
            },
            Lifeline::AiSupport => {
                let hint = entry.game.use_ai_support().await?;
                if let HintSource::Fallback(reason) = &hint.source {
                    warn!(session = %id, provider = self.hints.name(), ?reason, "using fallback hint");
                }
                SupportOutcome::AiSupport {
                    hint,
                    supports: entry.game.supports(),
                }
            }
        };
        info!(session = %id, lifeline = lifeline.as_str(), "lifeline used");
        Ok(outcome)
    }

    /// Current public view. Still available after the game is decided.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` or `GameError::NoActiveQuestion`.
    pub async fn state(&self, id: SessionId) -> Result<PublicState, SessionError> {
        let shared = self.entry(id)?;
        let mut entry = shared.lock().await;
        entry.last_active = self.clock.now();
        Ok(entry.game.state()?)
    }

    /// Forget session `id`. Returns whether it existed.
    pub fn end_session(&self, id: SessionId) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            debug!(session = %id, "session ended");
        }
        removed
    }

    /// Drop sessions idle longer than the configured TTL.
    pub fn evict_idle(&self) -> usize {
        let evicted = self
            .registry
            .evict_idle(&self.clock, self.settings.session_ttl());
        if evicted > 0 {
            info!(evicted, remaining = self.registry.len(), "evicted idle sessions");
        }
        evicted
    }

    fn entry(&self, id: SessionId) -> Result<SharedEntry, SessionError> {
        self.registry.get(id).ok_or(SessionError::NotFound(id))
    }

    fn next_rng(&self) -> StdRng {
        let n = self.started.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(n)),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::hints::LocalHintProvider;
    use quiz_core::model::{Level, QuestionRecord};
    use quiz_core::time::fixed_now;

    fn service(levels: u32) -> GameService {
        let records = (1..=levels)
            .map(|l| {
                QuestionRecord::new(
                    Level::new(l).unwrap(),
                    format!("Level {l}?"),
                    ["a", "b", "c", "d"].map(String::from),
                    OptionPosition::B,
                    format!("Level {l} explained. Extra."),
                )
                .unwrap()
            })
            .collect();
        let max = Level::new(levels).unwrap();
        let store = Arc::new(QuestionStore::from_records(records, max).unwrap());
        GameService::new(
            store,
            Arc::new(LocalHintProvider),
            GameSettings::default().with_max_level(max),
            Clock::fixed(fixed_now()),
        )
        .with_rng_seed(7)
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let svc = service(2);
        let id = SessionId::new_v4();
        assert!(matches!(
            svc.submit_answer(id, 1).await,
            Err(SessionError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(svc.state(id).await, Err(SessionError::NotFound(_))));
        assert!(!svc.end_session(id));
    }

    #[tokio::test]
    async fn decided_game_rejects_further_moves_but_keeps_state() {
        let svc = service(2);
        let id = SessionId::new_v4();
        svc.start_session(id).await.unwrap();

        let outcome = svc.submit_answer(id, 1).await.unwrap();
        assert!(matches!(outcome, AnswerOutcome::Lost { .. }));

        assert!(matches!(
            svc.submit_answer(id, 2).await,
            Err(SessionError::Finished(_))
        ));
        assert!(matches!(
            svc.use_support(id, Lifeline::FiftyFifty).await,
            Err(SessionError::Finished(_))
        ));
        assert_eq!(svc.state(id).await.unwrap().level, 1);
    }

    #[tokio::test]
    async fn restart_clears_finished_flag() {
        let svc = service(1);
        let id = SessionId::new_v4();
        svc.start_session(id).await.unwrap();
        assert!(matches!(
            svc.submit_answer(id, 2).await.unwrap(),
            AnswerOutcome::Won { .. }
        ));

        let state = svc.start_session(id).await.unwrap();
        assert_eq!(state.level, 1);
        assert_eq!(svc.active_sessions(), 1);
        assert!(svc.submit_answer(id, 2).await.is_ok());
    }

    #[tokio::test]
    async fn game_errors_pass_through() {
        let svc = service(2);
        let id = SessionId::new_v4();
        svc.start_session(id).await.unwrap();
        svc.use_support(id, Lifeline::ChangeQuestion).await.unwrap();

        assert!(matches!(
            svc.use_support(id, Lifeline::ChangeQuestion).await,
            Err(SessionError::Game(GameError::AlreadyUsed(Lifeline::ChangeQuestion)))
        ));
        assert!(matches!(
            svc.submit_answer(id, 9).await,
            Err(SessionError::Game(GameError::InvalidPosition(9)))
        ));
    }

    #[tokio::test]
    async fn fresh_sessions_survive_eviction_and_end_removes() {
        let svc = service(2);
        let id = SessionId::new_v4();
        svc.start_session(id).await.unwrap();

        assert_eq!(svc.evict_idle(), 0);
        assert!(svc.end_session(id));
        assert_eq!(svc.active_sessions(), 0);
    }
}
