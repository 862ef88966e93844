use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{StudentId, TestId};
use crate::scoring::ScoreBreakdown;

/// Tolerance when checking a rehydrated percentage against the value derived
/// from the counts; the stored number round-trips through a REAL column.
const PERCENTAGE_EPSILON: f64 = 1e-6;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("student id must be non-zero")]
    InvalidStudent,

    #[error("an attempt covers at least one question")]
    NoQuestions,

    #[error("correct count ({correct}) exceeds total questions ({total})")]
    CorrectCountExceedsTotal { correct: u32, total: u32 },

    #[error("percentage {stored} does not match counts (derived {derived})")]
    PercentageMismatch { stored: f64, derived: f64 },
}

/// The scored outcome of one student's sitting of one test.
///
/// At most one attempt is live per `(student_id, test_id)` pair; a retake
/// overwrites the stored fields in place rather than adding history.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptResult {
    student_id: StudentId,
    test_id: TestId,
    completed_at: DateTime<Utc>,
    correct_count: u32,
    total_questions: u32,
    points_earned: u32,
    percentage: f64,
}

impl AttemptResult {
    /// Rehydrate an attempt from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` when the student id is zero, the question count
    /// is zero, the correct count exceeds it, or the stored percentage does
    /// not agree with the counts.
    pub fn from_persisted(
        student_id: StudentId,
        test_id: TestId,
        completed_at: DateTime<Utc>,
        correct_count: u32,
        total_questions: u32,
        points_earned: u32,
        percentage: f64,
    ) -> Result<Self, AttemptError> {
        if student_id.value() == 0 {
            return Err(AttemptError::InvalidStudent);
        }
        if total_questions == 0 {
            return Err(AttemptError::NoQuestions);
        }
        if correct_count > total_questions {
            return Err(AttemptError::CorrectCountExceedsTotal {
                correct: correct_count,
                total: total_questions,
            });
        }
        let derived = f64::from(correct_count) / f64::from(total_questions) * 100.0;
        if (percentage - derived).abs() > PERCENTAGE_EPSILON {
            return Err(AttemptError::PercentageMismatch {
                stored: percentage,
                derived,
            });
        }

        Ok(Self {
            student_id,
            test_id,
            completed_at,
            correct_count,
            total_questions,
            points_earned,
            percentage,
        })
    }

    /// Build an attempt from a scoring pass.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidStudent` for a zero student id, or the
    /// consistency errors of [`AttemptResult::from_persisted`] if the
    /// breakdown is malformed.
    pub fn from_score(
        student_id: StudentId,
        test_id: TestId,
        completed_at: DateTime<Utc>,
        breakdown: &ScoreBreakdown,
    ) -> Result<Self, AttemptError> {
        Self::from_persisted(
            student_id,
            test_id,
            completed_at,
            breakdown.correct_count,
            breakdown.total_questions,
            breakdown.points_earned,
            breakdown.percentage,
        )
    }

    #[must_use]
    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn points_earned(&self) -> u32 {
        self.points_earned
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn builds_from_breakdown() {
        let breakdown = ScoreBreakdown {
            correct_count: 8,
            total_questions: 10,
            points_earned: 220,
            percentage: 80.0,
        };

        let attempt = AttemptResult::from_score(
            StudentId::new(1),
            TestId::new(5),
            fixed_now(),
            &breakdown,
        )
        .unwrap();

        assert_eq!(attempt.correct_count(), 8);
        assert_eq!(attempt.points_earned(), 220);
        assert_eq!(attempt.percentage(), 80.0);
    }

    #[test]
    fn rejects_zero_student() {
        let breakdown = ScoreBreakdown {
            correct_count: 1,
            total_questions: 2,
            points_earned: 30,
            percentage: 50.0,
        };

        let err = AttemptResult::from_score(
            StudentId::new(0),
            TestId::new(5),
            fixed_now(),
            &breakdown,
        )
        .unwrap_err();
        assert_eq!(err, AttemptError::InvalidStudent);
    }

    #[test]
    fn rejects_zero_questions() {
        let err = AttemptResult::from_persisted(
            StudentId::new(1),
            TestId::new(5),
            fixed_now(),
            0,
            0,
            0,
            0.0,
        )
        .unwrap_err();
        assert_eq!(err, AttemptError::NoQuestions);
    }

    #[test]
    fn rejects_correct_above_total() {
        let err = AttemptResult::from_persisted(
            StudentId::new(1),
            TestId::new(5),
            fixed_now(),
            3,
            2,
            90,
            100.0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AttemptError::CorrectCountExceedsTotal { correct: 3, total: 2 }
        );
    }

    #[test]
    fn rejects_inconsistent_percentage() {
        let err = AttemptResult::from_persisted(
            StudentId::new(1),
            TestId::new(5),
            fixed_now(),
            1,
            2,
            30,
            75.0,
        )
        .unwrap_err();
        assert!(matches!(err, AttemptError::PercentageMismatch { .. }));
    }
}
