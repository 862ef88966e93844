//! Shared error types for the services crate.

use thiserror::Error;

use portal_core::model::{AnswerError, AttemptError};
use portal_core::scoring::ScoringError;
use storage::repository::StorageError;

/// Errors emitted by the test-taking session flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for this test")]
    Empty,
    #[error("test already submitted")]
    Completed,
    #[error("test is not open for sittings")]
    TestClosed,
    #[error("question index {index} out of range for {len} questions")]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("option index {index} out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AttemptService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LeaderboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LeaderboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
