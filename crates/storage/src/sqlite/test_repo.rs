use portal_core::model::{TestDefinition, TestId};

use super::SqliteRepository;
use super::mapping::{id_i64, map_test_row};
use crate::repository::{StorageError, TestRepository};

#[async_trait::async_trait]
impl TestRepository for SqliteRepository {
    async fn upsert_test(&self, test: &TestDefinition) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO tests (id, name, subject_name, lecturer_id, question_count, created_at, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                subject_name = excluded.subject_name,
                lecturer_id = excluded.lecturer_id,
                question_count = excluded.question_count,
                is_active = excluded.is_active
            ",
        )
        .bind(id_i64("test_id", test.id().value())?)
        .bind(test.name().to_owned())
        .bind(test.subject_name().to_owned())
        .bind(id_i64("lecturer_id", test.lecturer_id().value())?)
        .bind(i64::from(test.question_count()))
        .bind(test.created_at())
        .bind(i64::from(test.is_active()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_test(&self, id: TestId) -> Result<Option<TestDefinition>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, subject_name, lecturer_id, question_count, created_at, is_active
            FROM tests WHERE id = ?1
            ",
        )
        .bind(id_i64("test_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_test_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_active_tests(&self) -> Result<Vec<TestDefinition>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, subject_name, lecturer_id, question_count, created_at, is_active
            FROM tests
            WHERE is_active = 1
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut tests = Vec::with_capacity(rows.len());
        for row in rows {
            tests.push(map_test_row(&row)?);
        }
        Ok(tests)
    }
}
