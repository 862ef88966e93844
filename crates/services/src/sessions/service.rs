use chrono::{DateTime, Utc};

use portal_core::model::{AnswerSelection, AnswerSheet, Question, TestDefinition, TestId};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── TEST SESSION ──────────────────────────────────────────────────────────────
//

/// In-memory sitting of one test: the drawn questions, the student's answer
/// sheet, and a cursor for stepping between questions.
///
/// The session itself never touches storage; `TestRunService` hands it out on
/// start and persists the attempt on submit. Every question starts
/// unanswered, and a selection can be changed or cleared freely until the
/// sitting is submitted.
#[derive(Debug)]
pub struct TestSession {
    test_id: TestId,
    test_name: String,
    subject_name: String,
    questions: Vec<Question>,
    sheet: AnswerSheet,
    current: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    attempt_row_id: Option<i64>,
}

impl TestSession {
    /// Create a session over the drawn questions.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        test: &TestDefinition,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let sheet = AnswerSheet::new(questions.len());
        Ok(Self {
            test_id: test.id(),
            test_name: test.name().to_owned(),
            subject_name: test.subject_name().to_owned(),
            questions,
            sheet,
            current: 0,
            started_at,
            completed_at: None,
            attempt_row_id: None,
        })
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    #[must_use]
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Row id of the persisted attempt, set once the sitting is submitted.
    #[must_use]
    pub fn attempt_row_id(&self) -> Option<i64> {
        self.attempt_row_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerSelection] {
        self.sheet.selections()
    }

    /// Total number of questions in this sitting.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// The student's selection for the current question, if any.
    #[must_use]
    pub fn current_selection(&self) -> Option<usize> {
        self.sheet.selection(self.current).and_then(|s| s.selected())
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns a summary of the sitting so far.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            answered: self.sheet.answered_count(),
            unanswered: self.sheet.unanswered_count(),
            is_submitted: self.is_submitted(),
        }
    }

    /// Move the cursor to the next question. Returns false at the last one.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor to the previous question. Returns false at the first.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump the cursor to a specific question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionOutOfRange` for an invalid index.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.questions.len() {
            return Err(SessionError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Record a selection for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission, or
    /// `SessionError::OptionOutOfRange` when the index does not address one
    /// of the current question's options.
    pub fn select_option(&mut self, option_index: usize) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::Completed);
        }
        let len = self.current_question().options().len();
        if option_index >= len {
            return Err(SessionError::OptionOutOfRange {
                index: option_index,
                len,
            });
        }
        self.sheet.select(self.current, option_index)?;
        Ok(())
    }

    /// Reset the current question to unanswered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission.
    pub fn clear_selection(&mut self) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::Completed);
        }
        self.sheet.clear(self.current)?;
        Ok(())
    }

    pub(crate) fn mark_submitted(&mut self, completed_at: DateTime<Utc>, row_id: i64) {
        self.completed_at = Some(completed_at);
        self.attempt_row_id = Some(row_id);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::{LecturerId, QuestionId};
    use portal_core::time::fixed_now;

    fn build_test() -> TestDefinition {
        TestDefinition::new(
            TestId::new(1),
            "OOP Fundamentals Quiz",
            "Object-Oriented Programming",
            LecturerId::new(1),
            3,
            fixed_now(),
        )
        .unwrap()
    }

    fn build_questions(n: u64) -> Vec<Question> {
        (1..=n)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    TestId::new(1),
                    format!("Q{id}"),
                    vec!["A".into(), "B".into(), "C".into()],
                    0,
                    Question::DEFAULT_POINTS,
                )
                .unwrap()
            })
            .collect()
    }

    fn session() -> TestSession {
        TestSession::new(&build_test(), build_questions(3), fixed_now()).unwrap()
    }

    #[test]
    fn empty_draw_is_rejected() {
        let err = TestSession::new(&build_test(), Vec::new(), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn cursor_steps_and_clamps() {
        let mut s = session();
        assert_eq!(s.current_index(), 0);
        assert!(!s.previous());

        assert!(s.next());
        assert!(s.next());
        assert!(!s.next());
        assert_eq!(s.current_index(), 2);

        s.go_to(0).unwrap();
        assert_eq!(s.current_index(), 0);
        let err = s.go_to(3).unwrap_err();
        assert!(matches!(err, SessionError::QuestionOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn selections_can_change_until_submitted() {
        let mut s = session();
        s.select_option(1).unwrap();
        assert_eq!(s.current_selection(), Some(1));

        s.select_option(2).unwrap();
        assert_eq!(s.current_selection(), Some(2));

        s.clear_selection().unwrap();
        assert_eq!(s.current_selection(), None);
    }

    #[test]
    fn option_index_is_validated_against_current_question() {
        let mut s = session();
        let err = s.select_option(3).unwrap_err();
        assert!(matches!(err, SessionError::OptionOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn progress_tracks_answered_count() {
        let mut s = session();
        s.select_option(0).unwrap();
        s.next();
        s.select_option(1).unwrap();

        let progress = s.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.unanswered, 1);
        assert!(!progress.is_submitted);
    }

    #[test]
    fn submitted_session_is_frozen() {
        let mut s = session();
        s.mark_submitted(fixed_now(), 7);

        assert!(s.is_submitted());
        assert_eq!(s.attempt_row_id(), Some(7));
        assert!(matches!(s.select_option(0), Err(SessionError::Completed)));
        assert!(matches!(s.clear_selection(), Err(SessionError::Completed)));
    }
}
