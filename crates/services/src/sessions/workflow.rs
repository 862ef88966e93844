use std::sync::Arc;

use portal_core::Clock;
use portal_core::model::{AttemptResult, StudentId, TestId};
use portal_core::scoring;
use storage::repository::{AttemptRepository, QuestionRepository, StorageError, TestRepository};

use super::plan::QuestionDrawer;
use super::service::TestSession;
use crate::error::SessionError;

/// Result of submitting a completed sitting.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub attempt: AttemptResult,
    pub row_id: i64,
}

/// Orchestrates sitting start and scored, persisted submission.
#[derive(Clone)]
pub struct TestRunService {
    clock: Clock,
    tests: Arc<dyn TestRepository>,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn AttemptRepository>,
    shuffle_questions: bool,
}

impl TestRunService {
    #[must_use]
    pub fn new(
        clock: Clock,
        tests: Arc<dyn TestRepository>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            clock,
            tests,
            questions,
            attempts,
            shuffle_questions: true,
        }
    }

    /// Enable or disable shuffling of the question draw.
    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle: bool) -> Self {
        self.shuffle_questions = shuffle;
        self
    }

    /// Start a sitting of the given test.
    ///
    /// Draws `question_count` questions from the test's pool, shuffled unless
    /// disabled.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage(NotFound)` for an unknown test,
    /// `TestClosed` for a deactivated one, and `Empty` when its pool has no
    /// questions.
    pub async fn start(&self, test_id: TestId) -> Result<TestSession, SessionError> {
        let test = self
            .tests
            .get_test(test_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        if !test.is_active() {
            return Err(SessionError::TestClosed);
        }

        let pool = self.questions.questions_for_test(test_id).await?;
        let draw = QuestionDrawer::new(test.question_count())
            .with_shuffle(self.shuffle_questions)
            .draw(pool);

        TestSession::new(&test, draw.questions, self.clock.now())
    }

    /// Score the sitting and persist the attempt.
    ///
    /// The stored attempt replaces any previous one for the same
    /// `(student, test)` pair; retakes update the existing row. Submitting the
    /// same session twice fails without touching storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` on a second submit, scoring or
    /// attempt-construction errors for malformed state, and
    /// `SessionError::Storage` when persistence fails.
    pub async fn submit(
        &self,
        session: &mut TestSession,
        student_id: StudentId,
    ) -> Result<SubmissionOutcome, SessionError> {
        if session.is_submitted() {
            return Err(SessionError::Completed);
        }

        let breakdown = scoring::score(session.questions(), session.answers())?;
        let completed_at = self.clock.now();
        let attempt =
            AttemptResult::from_score(student_id, session.test_id(), completed_at, &breakdown)?;

        let row_id = self.attempts.upsert_attempt(&attempt).await?;
        session.mark_submitted(completed_at, row_id);

        Ok(SubmissionOutcome { attempt, row_id })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
