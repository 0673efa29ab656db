use async_trait::async_trait;
use quiz_core::model::QuestionRecord;

use super::SqliteRepository;
use super::mapping::map_question_row;
use crate::repository::{QuestionRow, QuestionSource, StorageError, rows_into_records};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteRepository {
    /// Insert questions in one transaction, optionally clearing the table first.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if any statement fails; nothing is committed then.
    pub async fn insert_questions(
        &self,
        records: &[QuestionRecord],
        replace: bool,
    ) -> Result<u64, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        if replace {
            sqlx::query("DELETE FROM questions")
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }

        let mut inserted = 0_u64;
        for record in records {
            let row = QuestionRow::from_record(record);
            sqlx::query(
                r"
                INSERT INTO questions (level, question, answer1, answer2, answer3, answer4, correct, explanation)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
            )
            .bind(i64::from(row.level))
            .bind(row.question)
            .bind(row.answer1)
            .bind(row.answer2)
            .bind(row.answer3)
            .bind(row.answer4)
            .bind(i64::from(row.correct))
            .bind(row.explanation)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
            inserted += 1;
        }

        tx.commit().await.map_err(conn)?;
        Ok(inserted)
    }

    /// Number of stored questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` on query failure.
    pub async fn count_questions(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        u64::try_from(count).map_err(|_| StorageError::Serialization("negative count".into()))
    }
}

#[async_trait]
impl QuestionSource for SqliteRepository {
    async fn load_all(&self) -> Result<Vec<QuestionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT level, question, answer1, answer2, answer3, answer4, correct, explanation
            FROM questions
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut mapped = Vec::with_capacity(rows.len());
        for row in &rows {
            mapped.push(map_question_row(row)?);
        }
        rows_into_records(mapped)
    }
}
