use std::sync::Arc;

use portal_core::model::{AttemptResult, StudentId, TestId};
use storage::repository::AttemptRepository;

use crate::error::AttemptServiceError;

/// Facade over the attempt ledger for callers that are not running a
/// session, e.g. result screens re-reading stored attempts.
///
/// Recording goes through the same upsert as session submission: one live
/// row per `(student, test)` pair, last attempt wins.
#[derive(Clone)]
pub struct AttemptService {
    attempts: Arc<dyn AttemptRepository>,
}

impl AttemptService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self { attempts }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(storage::repository::InMemoryRepository::new()))
    }

    /// Persist an attempt, replacing any previous one for the same pair.
    /// Returns the stored row id, stable across retakes.
    ///
    /// # Errors
    ///
    /// Returns `AttemptServiceError::Storage` on repository failures.
    pub async fn record(&self, attempt: &AttemptResult) -> Result<i64, AttemptServiceError> {
        let id = self.attempts.upsert_attempt(attempt).await?;
        Ok(id)
    }

    /// All current results for a student, in first-submission order.
    ///
    /// # Errors
    ///
    /// Returns `AttemptServiceError::Storage` on repository failures.
    pub async fn results_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<AttemptResult>, AttemptServiceError> {
        let results = self.attempts.attempts_for_student(student_id).await?;
        Ok(results)
    }

    /// The student's current result for one test, if any.
    ///
    /// # Errors
    ///
    /// Returns `AttemptServiceError::Storage` on repository failures.
    pub async fn result_for_test(
        &self,
        student_id: StudentId,
        test_id: TestId,
    ) -> Result<Option<AttemptResult>, AttemptServiceError> {
        let result = self.attempts.get_attempt(student_id, test_id).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::time::fixed_now;

    fn attempt(student: u64, test: u64, correct: u32, total: u32) -> AttemptResult {
        let percentage = f64::from(correct) / f64::from(total) * 100.0;
        AttemptResult::from_persisted(
            StudentId::new(student),
            TestId::new(test),
            fixed_now(),
            correct,
            total,
            correct * 30,
            percentage,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn record_twice_keeps_one_result() {
        let svc = AttemptService::in_memory();

        let id_a = svc.record(&attempt(1, 5, 8, 10)).await.unwrap();
        let id_b = svc.record(&attempt(1, 5, 6, 10)).await.unwrap();
        assert_eq!(id_a, id_b);

        let results = svc.results_for_student(StudentId::new(1)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].percentage(), 60.0);
    }

    #[tokio::test]
    async fn result_for_test_is_pair_scoped() {
        let svc = AttemptService::in_memory();
        svc.record(&attempt(1, 5, 8, 10)).await.unwrap();
        svc.record(&attempt(2, 5, 4, 10)).await.unwrap();

        let mine = svc
            .result_for_test(StudentId::new(1), TestId::new(5))
            .await
            .unwrap()
            .expect("own result");
        assert_eq!(mine.correct_count(), 8);

        let none = svc
            .result_for_test(StudentId::new(1), TestId::new(6))
            .await
            .unwrap();
        assert!(none.is_none());
    }
}
