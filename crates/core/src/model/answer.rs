use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("question index {index} out of range for sheet of {len}")]
    QuestionOutOfRange { index: usize, len: usize },
}

/// The choice a student made (or did not make) for one question.
///
/// `selected` is `None` while the question is unanswered; an unanswered
/// question is neither rewarded nor penalized when the sheet is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerSelection {
    question_index: usize,
    selected: Option<usize>,
}

impl AnswerSelection {
    #[must_use]
    pub fn answered(question_index: usize, option_index: usize) -> Self {
        Self {
            question_index,
            selected: Some(option_index),
        }
    }

    #[must_use]
    pub fn unanswered(question_index: usize) -> Self {
        Self {
            question_index,
            selected: None,
        }
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }
}

/// One selection slot per question of a sitting, all unanswered at start.
///
/// The sheet tracks positions only; validating a selected option against the
/// question's option list is the session layer's job, since the sheet does
/// not hold the questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    selections: Vec<AnswerSelection>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new(question_count: usize) -> Self {
        Self {
            selections: (0..question_count).map(AnswerSelection::unanswered).collect(),
        }
    }

    /// Record a selection for the given question.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::QuestionOutOfRange` if `question_index` does not
    /// address a slot on this sheet.
    pub fn select(&mut self, question_index: usize, option_index: usize) -> Result<(), AnswerError> {
        let len = self.selections.len();
        let slot = self
            .selections
            .get_mut(question_index)
            .ok_or(AnswerError::QuestionOutOfRange {
                index: question_index,
                len,
            })?;
        *slot = AnswerSelection::answered(question_index, option_index);
        Ok(())
    }

    /// Reset the given question back to unanswered.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::QuestionOutOfRange` if `question_index` does not
    /// address a slot on this sheet.
    pub fn clear(&mut self, question_index: usize) -> Result<(), AnswerError> {
        let len = self.selections.len();
        let slot = self
            .selections
            .get_mut(question_index)
            .ok_or(AnswerError::QuestionOutOfRange {
                index: question_index,
                len,
            })?;
        *slot = AnswerSelection::unanswered(question_index);
        Ok(())
    }

    #[must_use]
    pub fn selection(&self, question_index: usize) -> Option<AnswerSelection> {
        self.selections.get(question_index).copied()
    }

    #[must_use]
    pub fn selections(&self) -> &[AnswerSelection] {
        &self.selections
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_answered()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.selections.len() - self.answered_count()
    }
}
