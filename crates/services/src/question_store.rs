use std::collections::BTreeMap;
use std::sync::Arc;

use rand::Rng;
use rand::seq::IndexedRandom;

use quiz_core::model::{Level, QuestionRecord};
use storage::repository::QuestionSource;

use crate::error::QuestionStoreError;

/// Read-only question bank grouped by level.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it afterwards,
/// so concurrent sessions read it without locking.
#[derive(Debug, Clone)]
pub struct QuestionStore {
    by_level: BTreeMap<Level, Vec<Arc<QuestionRecord>>>,
    max_level: Level,
    total: usize,
}

impl QuestionStore {
    /// Load every question from `source` and group it by level.
    ///
    /// # Errors
    ///
    /// Returns `QuestionStoreError::Storage` if the source is missing or malformed, plus
    /// the validation errors of [`QuestionStore::from_records`].
    pub async fn load(
        source: &dyn QuestionSource,
        max_level: Level,
    ) -> Result<Self, QuestionStoreError> {
        let records = source.load_all().await?;
        Self::from_records(records, max_level)
    }

    /// # Errors
    ///
    /// Returns `QuestionStoreError::Empty` for an empty list and
    /// `QuestionStoreError::LevelOutOfRange` for a record above `max_level`.
    pub fn from_records(
        records: Vec<QuestionRecord>,
        max_level: Level,
    ) -> Result<Self, QuestionStoreError> {
        if records.is_empty() {
            return Err(QuestionStoreError::Empty);
        }

        let total = records.len();
        let mut by_level: BTreeMap<Level, Vec<Arc<QuestionRecord>>> = BTreeMap::new();
        for (index, record) in records.into_iter().enumerate() {
            if record.level() > max_level {
                return Err(QuestionStoreError::LevelOutOfRange {
                    index,
                    level: record.level(),
                    max: max_level,
                });
            }
            by_level
                .entry(record.level())
                .or_default()
                .push(Arc::new(record));
        }

        Ok(Self {
            by_level,
            max_level,
            total,
        })
    }

    /// Uniformly pick one question at `level`, or `None` when the level has no content.
    pub fn select_random<R: Rng + ?Sized>(
        &self,
        level: Level,
        rng: &mut R,
    ) -> Option<Arc<QuestionRecord>> {
        self.by_level
            .get(&level)
            .and_then(|pool| pool.choose(rng))
            .cloned()
    }

    #[must_use]
    pub fn max_level(&self) -> Level {
        self.max_level
    }

    /// Total number of questions across all levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    #[must_use]
    pub fn count_at(&self, level: Level) -> usize {
        self.by_level.get(&level).map_or(0, Vec::len)
    }

    /// Levels between 1 and the maximum that have no question at all.
    ///
    /// A non-empty result means a game can get stuck with `NoQuestionAvailable`.
    #[must_use]
    pub fn missing_levels(&self) -> Vec<Level> {
        (1..=self.max_level.value())
            .filter_map(|v| Level::new(v).ok())
            .filter(|level| !self.by_level.contains_key(level))
            .collect()
    }
}
