use portal_core::model::{Question, TestId};

use super::SqliteRepository;
use super::mapping::{id_i64, map_question_row, ser};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let options = serde_json::to_string(question.options()).map_err(ser)?;
        let correct = i64::try_from(question.correct_answer_index())
            .map_err(|_| StorageError::Serialization("correct_answer_index overflow".into()))?;

        sqlx::query(
            r"
            INSERT INTO questions (id, test_id, prompt, options, correct_answer_index, points)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id, test_id) DO UPDATE SET
                prompt = excluded.prompt,
                options = excluded.options,
                correct_answer_index = excluded.correct_answer_index,
                points = excluded.points
            ",
        )
        .bind(id_i64("question_id", question.id().value())?)
        .bind(id_i64("test_id", question.test_id().value())?)
        .bind(question.prompt().to_owned())
        .bind(options)
        .bind(correct)
        .bind(i64::from(question.points()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn questions_for_test(&self, test_id: TestId) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, test_id, prompt, options, correct_answer_index, points
            FROM questions
            WHERE test_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_i64("test_id", test_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(map_question_row(&row)?);
        }
        Ok(questions)
    }
}
