use portal_core::model::{AttemptResult, StudentId, TestId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{id_i64, map_attempt_row, ser};
use crate::repository::{AttemptRepository, AttemptRow, StorageError};

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn upsert_attempt(&self, attempt: &AttemptResult) -> Result<i64, StorageError> {
        // Single statement so a retake lands atomically; the conflict update
        // leaves the original row id in place.
        let row = sqlx::query(
            r"
            INSERT INTO test_attempts (
                student_id, test_id, completed_at, correct_count,
                total_questions, points_earned, percentage
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(student_id, test_id) DO UPDATE SET
                completed_at = excluded.completed_at,
                correct_count = excluded.correct_count,
                total_questions = excluded.total_questions,
                points_earned = excluded.points_earned,
                percentage = excluded.percentage
            RETURNING id
            ",
        )
        .bind(id_i64("student_id", attempt.student_id().value())?)
        .bind(id_i64("test_id", attempt.test_id().value())?)
        .bind(attempt.completed_at())
        .bind(i64::from(attempt.correct_count()))
        .bind(i64::from(attempt.total_questions()))
        .bind(i64::from(attempt.points_earned()))
        .bind(attempt.percentage())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.try_get::<i64, _>("id").map_err(ser)
    }

    async fn get_attempt(
        &self,
        student_id: StudentId,
        test_id: TestId,
    ) -> Result<Option<AttemptResult>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT student_id, test_id, completed_at, correct_count,
                   total_questions, points_earned, percentage
            FROM test_attempts
            WHERE student_id = ?1 AND test_id = ?2
            ",
        )
        .bind(id_i64("student_id", student_id.value())?)
        .bind(id_i64("test_id", test_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_attempt_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn attempts_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<AttemptResult>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT student_id, test_id, completed_at, correct_count,
                   total_questions, points_earned, percentage
            FROM test_attempts
            WHERE student_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_i64("student_id", student_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut attempts = Vec::with_capacity(rows.len());
        for row in rows {
            attempts.push(map_attempt_row(&row)?);
        }
        Ok(attempts)
    }

    async fn list_attempt_rows(&self) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, student_id, test_id, completed_at, correct_count,
                   total_questions, points_earned, percentage
            FROM test_attempts
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(ser)?;
            out.push(AttemptRow::new(id, map_attempt_row(&row)?));
        }
        Ok(out)
    }
}
