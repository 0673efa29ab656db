use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{QuestionRow, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range: {v}")))
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<QuestionRow, StorageError> {
    Ok(QuestionRow {
        level: i64_to_u32("level", row.try_get("level").map_err(ser)?)?,
        question: row.try_get("question").map_err(ser)?,
        answer1: row.try_get("answer1").map_err(ser)?,
        answer2: row.try_get("answer2").map_err(ser)?,
        answer3: row.try_get("answer3").map_err(ser)?,
        answer4: row.try_get("answer4").map_err(ser)?,
        correct: i64_to_u32("correct", row.try_get("correct").map_err(ser)?)?,
        explanation: row.try_get("explanation").map_err(ser)?,
    })
}
