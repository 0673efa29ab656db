use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as AsyncMutex;

use quiz_core::Clock;
use quiz_core::model::SessionId;

use super::game::GameSession;

/// A registered session plus the bookkeeping the facade needs.
#[derive(Debug)]
pub(crate) struct SessionEntry {
    pub(crate) game: GameSession,
    pub(crate) finished: bool,
    pub(crate) last_active: DateTime<Utc>,
}

impl SessionEntry {
    pub(crate) fn new(game: GameSession, now: DateTime<Utc>) -> Self {
        Self {
            game,
            finished: false,
            last_active: now,
        }
    }
}

pub(crate) type SharedEntry = Arc<AsyncMutex<SessionEntry>>;

/// Sessions keyed by id.
///
/// The outer lock only guards the map and is never held across an await. Each
/// session has its own async lock, so operations on one session are serialized
/// while different sessions proceed independently.
#[derive(Debug, Default)]
pub(crate) struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SharedEntry>>,
}

impl SessionRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `entry` under `id`, replacing any previous session with that id.
    pub(crate) fn insert(&self, id: SessionId, entry: SessionEntry) -> bool {
        let shared = Arc::new(AsyncMutex::new(entry));
        self.lock().insert(id, shared).is_some()
    }

    pub(crate) fn get(&self, id: SessionId) -> Option<SharedEntry> {
        self.lock().get(&id).cloned()
    }

    pub(crate) fn remove(&self, id: SessionId) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Drop sessions idle for at least `ttl` according to `clock`.
    ///
    /// Sessions currently locked by an in-flight operation are skipped.
    pub(crate) fn evict_idle(&self, clock: &Clock, ttl: Duration) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, entry| match entry.try_lock() {
            Ok(entry) => !clock.has_elapsed(entry.last_active, ttl),
            Err(_) => true,
        });
        before - sessions.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, SharedEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hints::LocalHintProvider;
    use crate::question_store::QuestionStore;
    use crate::settings::GameSettings;
    use quiz_core::model::{Level, OptionPosition, QuestionRecord};
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn entry(now: DateTime<Utc>) -> SessionEntry {
        let record = QuestionRecord::new(
            Level::FIRST,
            "Q?",
            ["a", "b", "c", "d"].map(String::from),
            OptionPosition::A,
            "Because.",
        )
        .unwrap();
        let store = Arc::new(QuestionStore::from_records(vec![record], Level::FIRST).unwrap());
        let game = GameSession::new(
            store,
            Arc::new(LocalHintProvider),
            &GameSettings::default(),
            StdRng::seed_from_u64(1),
        );
        SessionEntry::new(game, now)
    }

    #[test]
    fn insert_replaces_existing_id() {
        let registry = SessionRegistry::new();
        let id = SessionId::new_v4();

        assert!(!registry.insert(id, entry(fixed_now())));
        assert!(registry.insert(id, entry(fixed_now())));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(id).is_some());
    }

    #[test]
    fn remove_reports_presence() {
        let registry = SessionRegistry::new();
        let id = SessionId::new_v4();
        registry.insert(id, entry(fixed_now()));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.get(id).is_none());
    }

    #[test]
    fn evicts_only_sessions_past_ttl() {
        let registry = SessionRegistry::new();
        let now = fixed_now();
        let stale = SessionId::new_v4();
        let fresh = SessionId::new_v4();
        registry.insert(stale, entry(now - chrono::Duration::minutes(31)));
        registry.insert(fresh, entry(now - chrono::Duration::minutes(5)));

        let evicted = registry.evict_idle(&Clock::fixed(now), Duration::from_secs(30 * 60));
        assert_eq!(evicted, 1);
        assert!(registry.get(stale).is_none());
        assert!(registry.get(fresh).is_some());
    }

    #[test]
    fn busy_sessions_are_not_evicted() {
        let registry = SessionRegistry::new();
        let now = fixed_now();
        let id = SessionId::new_v4();
        registry.insert(id, entry(now - chrono::Duration::hours(2)));

        let shared = registry.get(id).unwrap();
        let _guard = shared.try_lock().unwrap();
        assert_eq!(registry.evict_idle(&Clock::fixed(now), Duration::from_secs(60)), 0);
        assert_eq!(registry.len(), 1);
    }
}
