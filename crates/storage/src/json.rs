use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use quiz_core::model::QuestionRecord;

use crate::repository::{QuestionRow, QuestionSource, StorageError, rows_into_records};

/// Parse a JSON array of question rows.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidRecord` for rows that fail validation.
pub fn parse_questions(raw: &str) -> Result<Vec<QuestionRecord>, StorageError> {
    let rows: Vec<QuestionRow> =
        serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
    rows_into_records(rows)
}

/// Reads the question bank from a JSON file such as `questions.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn load_all(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(self.path.display().to_string()),
            _ => StorageError::Io(format!("{}: {e}", self.path.display())),
        })?;
        parse_questions(&raw)
    }
}
