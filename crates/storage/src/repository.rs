use async_trait::async_trait;
use quiz_core::model::{Level, OptionPosition, QuestionError, QuestionRecord};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::json::JsonFileSource;

/// Errors surfaced by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("question source not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("question #{index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Persisted shape for a question.
///
/// This mirrors the external data format (`answer1`..`answer4`, `correct` as 1-4) so
/// JSON files and `SQLite` rows share one mapping into the domain `QuestionRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRow {
    pub level: u32,
    pub question: String,
    pub answer1: String,
    pub answer2: String,
    pub answer3: String,
    pub answer4: String,
    pub correct: u32,
    pub explanation: String,
}

impl QuestionRow {
    #[must_use]
    pub fn from_record(record: &QuestionRecord) -> Self {
        let [answer1, answer2, answer3, answer4] = record.options().clone();
        Self {
            level: record.level().value(),
            question: record.question().to_owned(),
            answer1,
            answer2,
            answer3,
            answer4,
            correct: record.correct().value(),
            explanation: record.explanation().to_owned(),
        }
    }

    /// Convert the row into a validated domain `QuestionRecord`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the level, correct position or any text is invalid.
    pub fn into_record(self) -> Result<QuestionRecord, QuestionError> {
        QuestionRecord::new(
            Level::new(self.level)?,
            self.question,
            [self.answer1, self.answer2, self.answer3, self.answer4],
            OptionPosition::new(self.correct)?,
            self.explanation,
        )
    }
}

/// Validates rows in order, reporting the first bad one by its index.
///
/// # Errors
///
/// Returns `StorageError::InvalidRecord` for the first row that fails validation.
pub fn rows_into_records(
    rows: impl IntoIterator<Item = QuestionRow>,
) -> Result<Vec<QuestionRecord>, StorageError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            row.into_record()
                .map_err(|source| StorageError::InvalidRecord { index, source })
        })
        .collect()
}

/// Source contract for the question bank. Loaded once at startup.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load every question the source holds, in source order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source is missing, unreadable or malformed.
    async fn load_all(&self) -> Result<Vec<QuestionRecord>, StorageError>;
}

/// Fixed in-memory question list for tests and embedding.
#[derive(Clone, Default)]
pub struct InMemoryQuestionSource {
    records: Arc<Vec<QuestionRecord>>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn load_all(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        Ok(self.records.as_ref().clone())
    }
}

/// Question source behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(records: Vec<QuestionRecord>) -> Self {
        Self {
            questions: Arc::new(InMemoryQuestionSource::new(records)),
        }
    }

    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            questions: Arc::new(JsonFileSource::new(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(level: u32, correct: u32) -> QuestionRow {
        QuestionRow {
            level,
            question: "Which planet is known as the red planet?".into(),
            answer1: "Venus".into(),
            answer2: "Mars".into(),
            answer3: "Jupiter".into(),
            answer4: "Saturn".into(),
            correct,
            explanation: "Mars appears red because of iron oxide on its surface.".into(),
        }
    }

    #[test]
    fn row_maps_to_record_and_back() {
        let record = row(3, 2).into_record().unwrap();
        assert_eq!(record.level().value(), 3);
        assert_eq!(record.correct(), OptionPosition::B);
        assert_eq!(record.option(OptionPosition::D), "Saturn");
        assert_eq!(QuestionRow::from_record(&record), row(3, 2));
    }

    #[test]
    fn invalid_rows_report_their_index() {
        let err = rows_into_records(vec![row(1, 1), row(1, 9)]).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidRecord {
                index: 1,
                source: QuestionError::InvalidPosition(9)
            }
        ));

        let err = rows_into_records(vec![row(0, 1)]).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidRecord {
                index: 0,
                source: QuestionError::InvalidLevel(0)
            }
        ));
    }

    #[tokio::test]
    async fn in_memory_source_returns_records() {
        let records = rows_into_records(vec![row(1, 1), row(2, 4)]).unwrap();
        let storage = Storage::in_memory(records.clone());
        let loaded = storage.questions.load_all().await.unwrap();
        assert_eq!(loaded, records);
    }
}
