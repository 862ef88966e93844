use std::sync::Arc;

use chrono::{DateTime, Utc};

use portal_core::model::{StudentId, TestDefinition, TestId};
use storage::repository::{AttemptRepository, TestRepository};

use crate::error::DashboardError;

/// Headline numbers for a student's dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentMetrics {
    pub total_points: u64,
    pub tests_completed: usize,
    pub average_percentage: f64,
}

/// One completed test as shown in history lists.
///
/// Not a UI view-model: timestamps and percentages are raw values, formatting
/// belongs to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedTest {
    pub test_id: TestId,
    pub test_name: String,
    pub subject_name: String,
    pub correct_count: u32,
    pub total_questions: u32,
    pub points_earned: u32,
    pub percentage: f64,
    pub completed_at: DateTime<Utc>,
}

/// Derives dashboard data (metrics, to-do list, history) from the ledger and
/// the test catalogue.
#[derive(Clone)]
pub struct DashboardService {
    attempts: Arc<dyn AttemptRepository>,
    tests: Arc<dyn TestRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptRepository>, tests: Arc<dyn TestRepository>) -> Self {
        Self { attempts, tests }
    }

    /// Total points, completed count, and mean percentage across the
    /// student's current results. All zero for a student with no attempts.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` on repository failures.
    pub async fn metrics(&self, student_id: StudentId) -> Result<StudentMetrics, DashboardError> {
        let attempts = self.attempts.attempts_for_student(student_id).await?;

        let total_points = attempts
            .iter()
            .map(|a| u64::from(a.points_earned()))
            .sum();
        let tests_completed = attempts.len();
        #[allow(clippy::cast_precision_loss)]
        let average_percentage = if attempts.is_empty() {
            0.0
        } else {
            let sum: f64 = attempts.iter().map(|a| a.percentage()).sum();
            sum / attempts.len() as f64
        };

        Ok(StudentMetrics {
            total_points,
            tests_completed,
            average_percentage,
        })
    }

    /// Active tests the student has not completed yet, in id order.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` on repository failures.
    pub async fn todo_tests(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<TestDefinition>, DashboardError> {
        let attempts = self.attempts.attempts_for_student(student_id).await?;
        let completed: Vec<TestId> = attempts.iter().map(|a| a.test_id()).collect();

        let active = self.tests.list_active_tests().await?;
        Ok(active
            .into_iter()
            .filter(|test| !completed.contains(&test.id()))
            .collect())
    }

    /// The student's completed tests, chronological by completion time.
    /// Attempts whose test no longer resolves are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` on repository failures.
    pub async fn completed_tests(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<CompletedTest>, DashboardError> {
        let attempts = self.attempts.attempts_for_student(student_id).await?;

        let mut items = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            let Some(test) = self.tests.get_test(attempt.test_id()).await? else {
                continue;
            };
            items.push(CompletedTest {
                test_id: test.id(),
                test_name: test.name().to_owned(),
                subject_name: test.subject_name().to_owned(),
                correct_count: attempt.correct_count(),
                total_questions: attempt.total_questions(),
                points_earned: attempt.points_earned(),
                percentage: attempt.percentage(),
                completed_at: attempt.completed_at(),
            });
        }

        // Stable sort keeps submission order among equal timestamps.
        items.sort_by_key(|item| item.completed_at);
        Ok(items)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
