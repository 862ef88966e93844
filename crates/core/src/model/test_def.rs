use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{LecturerId, TestId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestDefinitionError {
    #[error("test name cannot be empty")]
    EmptyName,

    #[error("subject name cannot be empty")]
    EmptySubject,

    #[error("question count must be > 0")]
    InvalidQuestionCount,
}

/// A test as authored by a lecturer: a named question pool within a subject.
///
/// `question_count` is how many questions a sitting draws from the pool, not
/// necessarily the pool's size. Newly created tests are active; deactivated
/// tests stay stored but cannot be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDefinition {
    id: TestId,
    name: String,
    subject_name: String,
    lecturer_id: LecturerId,
    question_count: u32,
    created_at: DateTime<Utc>,
    is_active: bool,
}

impl TestDefinition {
    /// Build a validated, active test definition.
    ///
    /// # Errors
    ///
    /// Returns `TestDefinitionError` when the name or subject is empty or the
    /// question count is zero.
    pub fn new(
        id: TestId,
        name: impl Into<String>,
        subject_name: impl Into<String>,
        lecturer_id: LecturerId,
        question_count: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TestDefinitionError> {
        let name = name.into();
        let subject_name = subject_name.into();
        if name.trim().is_empty() {
            return Err(TestDefinitionError::EmptyName);
        }
        if subject_name.trim().is_empty() {
            return Err(TestDefinitionError::EmptySubject);
        }
        if question_count == 0 {
            return Err(TestDefinitionError::InvalidQuestionCount);
        }

        Ok(Self {
            id,
            name,
            subject_name,
            lecturer_id,
            question_count,
            created_at,
            is_active: true,
        })
    }

    #[must_use]
    pub fn id(&self) -> TestId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    #[must_use]
    pub fn lecturer_id(&self) -> LecturerId {
        self.lecturer_id
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}
