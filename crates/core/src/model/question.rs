use thiserror::Error;

use crate::model::ids::{QuestionId, TestId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct answer index {index} out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("point value must be > 0")]
    InvalidPoints,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question belonging to a test.
///
/// Validated on construction and immutable afterwards: the option list has at
/// least two non-empty entries, the correct answer index points into it, and
/// the point value is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    test_id: TestId,
    prompt: String,
    options: Vec<String>,
    correct_answer_index: usize,
    points: u32,
}

impl Question {
    /// Point value a question carries unless the author sets one explicitly.
    pub const DEFAULT_POINTS: u32 = 30;

    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or any option is empty, fewer
    /// than two options are given, the correct index is out of range, or the
    /// point value is zero.
    pub fn new(
        id: QuestionId,
        test_id: TestId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer_index: usize,
        points: u32,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_answer_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_answer_index,
                len: options.len(),
            });
        }
        if points == 0 {
            return Err(QuestionError::InvalidPoints);
        }

        Ok(Self {
            id,
            test_id,
            prompt,
            options,
            correct_answer_index,
            points,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer_index(&self) -> usize {
        self.correct_answer_index
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Whether the given option index is the correct one.
    #[must_use]
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_answer_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Option {i}")).collect()
    }

    #[test]
    fn valid_question_builds() {
        let q = Question::new(
            QuestionId::new(1),
            TestId::new(5),
            "What is encapsulation?",
            options(4),
            1,
            Question::DEFAULT_POINTS,
        )
        .unwrap();

        assert_eq!(q.options().len(), 4);
        assert_eq!(q.correct_answer_index(), 1);
        assert_eq!(q.points(), 30);
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn rejects_empty_prompt() {
        let err = Question::new(
            QuestionId::new(1),
            TestId::new(5),
            "   ",
            options(2),
            0,
            30,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new(QuestionId::new(1), TestId::new(5), "Q", options(1), 0, 30)
            .unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn rejects_blank_option() {
        let mut opts = options(3);
        opts[2] = " ".to_string();
        let err =
            Question::new(QuestionId::new(1), TestId::new(5), "Q", opts, 0, 30).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 2 });
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Question::new(QuestionId::new(1), TestId::new(5), "Q", options(3), 3, 30)
            .unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn rejects_zero_points() {
        let err = Question::new(QuestionId::new(1), TestId::new(5), "Q", options(2), 0, 0)
            .unwrap_err();
        assert_eq!(err, QuestionError::InvalidPoints);
    }
}
