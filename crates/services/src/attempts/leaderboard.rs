use std::collections::HashMap;
use std::sync::Arc;

use portal_core::model::{StudentId, TestId};
use storage::repository::{AttemptRepository, DirectoryRepository, TestRepository};

use crate::error::LeaderboardError;

/// How many students a subject's standings show unless the caller asks for
/// a different cut-off.
pub const DEFAULT_TOP_N: usize = 5;

/// One student's standing within a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub student_id: StudentId,
    pub display_name: String,
    pub total_points: u64,
}

/// A subject's standings, best first.
///
/// Presentation-agnostic: no rank strings, no formatting. Subjects appear in
/// the order their first attempt was recorded; so do tied students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub subject_name: String,
    pub standings: Vec<LeaderboardRow>,
}

/// Derives per-subject standings from the attempt ledger.
///
/// Nothing is stored: every call recomputes from the current attempts, so a
/// retake that lowered a score is reflected immediately.
#[derive(Clone)]
pub struct LeaderboardService {
    attempts: Arc<dyn AttemptRepository>,
    tests: Arc<dyn TestRepository>,
    directory: Arc<dyn DirectoryRepository>,
}

struct SubjectTotals {
    subject_name: String,
    // (student, summed points) in first-seen order; sorted at the end.
    totals: Vec<(StudentId, u64)>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(
        attempts: Arc<dyn AttemptRepository>,
        tests: Arc<dyn TestRepository>,
        directory: Arc<dyn DirectoryRepository>,
    ) -> Self {
        Self {
            attempts,
            tests,
            directory,
        }
    }

    /// Compute the leaderboard: per subject, the `top_n` students by summed
    /// `points_earned` across that subject's tests, descending, ties kept in
    /// first-seen order. Subjects without attempts are absent; attempts whose
    /// test no longer resolves are skipped.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Storage` on repository failures.
    pub async fn leaderboard(
        &self,
        top_n: usize,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let rows = self.attempts.list_attempt_rows().await?;

        let mut subject_by_test: HashMap<TestId, Option<String>> = HashMap::new();
        let mut subjects: Vec<SubjectTotals> = Vec::new();

        for row in rows {
            let test_id = row.result.test_id();
            if !subject_by_test.contains_key(&test_id) {
                let subject = self
                    .tests
                    .get_test(test_id)
                    .await?
                    .map(|t| t.subject_name().to_owned());
                subject_by_test.insert(test_id, subject);
            }
            let Some(subject_name) = subject_by_test[&test_id].as_deref() else {
                continue;
            };

            let group_index = match subjects.iter().position(|s| s.subject_name == subject_name) {
                Some(index) => index,
                None => {
                    subjects.push(SubjectTotals {
                        subject_name: subject_name.to_owned(),
                        totals: Vec::new(),
                    });
                    subjects.len() - 1
                }
            };
            let group = &mut subjects[group_index];

            let student_id = row.result.student_id();
            let points = u64::from(row.result.points_earned());
            match group.totals.iter().position(|(id, _)| *id == student_id) {
                Some(index) => group.totals[index].1 += points,
                None => group.totals.push((student_id, points)),
            }
        }

        let mut entries = Vec::with_capacity(subjects.len());
        for mut group in subjects {
            // Stable sort keeps first-seen order among equal totals.
            group.totals.sort_by(|a, b| b.1.cmp(&a.1));
            group.totals.truncate(top_n);

            let mut standings = Vec::with_capacity(group.totals.len());
            for (student_id, total_points) in group.totals {
                standings.push(LeaderboardRow {
                    student_id,
                    display_name: self.display_name(student_id).await?,
                    total_points,
                });
            }

            entries.push(LeaderboardEntry {
                subject_name: group.subject_name,
                standings,
            });
        }

        Ok(entries)
    }

    async fn display_name(&self, student_id: StudentId) -> Result<String, LeaderboardError> {
        let name = self
            .directory
            .get_student(student_id)
            .await?
            .map_or_else(|| format!("Student #{student_id}"), |s| s.full_name());
        Ok(name)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::{
        Account, AttemptResult, LecturerId, Student, TestDefinition,
    };
    use portal_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    async fn seed_subject_test(repo: &InMemoryRepository, id: u64, subject: &str) {
        let test = TestDefinition::new(
            TestId::new(id),
            format!("Test {id}"),
            subject,
            LecturerId::new(1),
            4,
            fixed_now(),
        )
        .unwrap();
        TestRepository::upsert_test(repo, &test).await.unwrap();
    }

    async fn seed_student(repo: &InMemoryRepository, id: u64, first: &str, last: &str) {
        let student = Student::new(
            StudentId::new(id),
            format!("S{id:03}"),
            first,
            last,
            "CS",
            fixed_now(),
        )
        .unwrap();
        DirectoryRepository::upsert_account(repo, &Account::Student(student))
            .await
            .unwrap();
    }

    async fn seed_attempt(repo: &InMemoryRepository, student: u64, test: u64, points: u32) {
        // 2 of 4 correct keeps the percentage invariant happy regardless of
        // the points being exercised here.
        let attempt = AttemptResult::from_persisted(
            StudentId::new(student),
            TestId::new(test),
            fixed_now(),
            2,
            4,
            points,
            50.0,
        )
        .unwrap();
        AttemptRepository::upsert_attempt(repo, &attempt).await.unwrap();
    }

    fn service(repo: &InMemoryRepository) -> LeaderboardService {
        LeaderboardService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    #[tokio::test]
    async fn empty_ledger_yields_no_subjects() {
        let repo = InMemoryRepository::new();
        let entries = service(&repo).leaderboard(DEFAULT_TOP_N).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn groups_by_subject_and_sums_per_student() {
        let repo = InMemoryRepository::new();
        seed_subject_test(&repo, 1, "Algorithms").await;
        seed_subject_test(&repo, 2, "Algorithms").await;
        seed_subject_test(&repo, 3, "Databases").await;
        seed_student(&repo, 1, "John", "Smith").await;
        seed_student(&repo, 2, "Sarah", "Johnson").await;

        seed_attempt(&repo, 1, 1, 100).await;
        seed_attempt(&repo, 1, 2, 50).await;
        seed_attempt(&repo, 2, 1, 200).await;
        seed_attempt(&repo, 2, 3, 80).await;

        let entries = service(&repo).leaderboard(DEFAULT_TOP_N).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].subject_name, "Algorithms");
        assert_eq!(entries[1].subject_name, "Databases");

        let algorithms = &entries[0].standings;
        assert_eq!(algorithms.len(), 2);
        assert_eq!(algorithms[0].display_name, "Sarah Johnson");
        assert_eq!(algorithms[0].total_points, 200);
        assert_eq!(algorithms[1].display_name, "John Smith");
        assert_eq!(algorithms[1].total_points, 150);

        assert_eq!(entries[1].standings.len(), 1);
        assert_eq!(entries[1].standings[0].total_points, 80);
    }

    #[tokio::test]
    async fn truncates_to_top_n_with_non_increasing_points() {
        let repo = InMemoryRepository::new();
        seed_subject_test(&repo, 1, "Algorithms").await;
        for student in 1..=6 {
            seed_student(&repo, student, "Student", "N").await;
            seed_attempt(&repo, student, 1, u32::try_from(student).unwrap() * 10).await;
        }

        let entries = service(&repo).leaderboard(3).await.unwrap();
        let standings = &entries[0].standings;

        assert_eq!(standings.len(), 3);
        assert!(standings.windows(2).all(|w| w[0].total_points >= w[1].total_points));
        assert_eq!(standings[0].total_points, 60);
    }

    #[tokio::test]
    async fn ties_keep_first_seen_order() {
        let repo = InMemoryRepository::new();
        seed_subject_test(&repo, 1, "Algorithms").await;
        seed_student(&repo, 1, "First", "In").await;
        seed_student(&repo, 2, "Second", "In").await;

        seed_attempt(&repo, 1, 1, 100).await;
        seed_attempt(&repo, 2, 1, 100).await;

        let entries = service(&repo).leaderboard(DEFAULT_TOP_N).await.unwrap();
        let standings = &entries[0].standings;

        assert_eq!(standings[0].student_id, StudentId::new(1));
        assert_eq!(standings[1].student_id, StudentId::new(2));
    }

    #[tokio::test]
    async fn unresolvable_tests_are_skipped() {
        let repo = InMemoryRepository::new();
        seed_subject_test(&repo, 1, "Algorithms").await;
        seed_student(&repo, 1, "John", "Smith").await;

        seed_attempt(&repo, 1, 1, 100).await;
        // Test 99 was never defined; its attempt contributes nowhere.
        seed_attempt(&repo, 1, 99, 500).await;

        let entries = service(&repo).leaderboard(DEFAULT_TOP_N).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].standings[0].total_points, 100);
    }

    #[tokio::test]
    async fn unknown_student_gets_fallback_name() {
        let repo = InMemoryRepository::new();
        seed_subject_test(&repo, 1, "Algorithms").await;
        seed_attempt(&repo, 7, 1, 90).await;

        let entries = service(&repo).leaderboard(DEFAULT_TOP_N).await.unwrap();
        assert_eq!(entries[0].standings[0].display_name, "Student #7");
    }

    #[tokio::test]
    async fn retake_is_reflected_not_accumulated() {
        let repo = InMemoryRepository::new();
        seed_subject_test(&repo, 1, "Algorithms").await;
        seed_student(&repo, 1, "John", "Smith").await;

        seed_attempt(&repo, 1, 1, 100).await;
        seed_attempt(&repo, 1, 1, 40).await; // retake, lower score

        let entries = service(&repo).leaderboard(DEFAULT_TOP_N).await.unwrap();
        assert_eq!(entries[0].standings[0].total_points, 40);
    }
}
