use std::sync::Arc;

use portal_core::model::{
    Account, LecturerId, Question, QuestionId, Student, StudentId, TestDefinition, TestId,
};
use portal_core::time::{fixed_clock, fixed_now};
use services::{DashboardService, LeaderboardService, TestRunService};
use storage::repository::{
    DirectoryRepository, InMemoryRepository, QuestionRepository, TestRepository,
};

async fn seed_portal(repo: &InMemoryRepository) {
    let lecturer = LecturerId::new(1);
    let subjects = [(1_u64, "Object-Oriented Programming"), (2, "Data Structures")];
    for (id, subject) in subjects {
        let test = TestDefinition::new(
            TestId::new(id),
            format!("Test {id}"),
            subject,
            lecturer,
            3,
            fixed_now(),
        )
        .unwrap();
        repo.upsert_test(&test).await.unwrap();

        for qid in 1..=3_u64 {
            let question = Question::new(
                QuestionId::new(qid),
                test.id(),
                format!("T{id} Q{qid}"),
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                0,
                Question::DEFAULT_POINTS,
            )
            .unwrap();
            repo.upsert_question(&question).await.unwrap();
        }
    }

    for (id, first, last) in [(1_u64, "John", "Smith"), (2, "Sarah", "Johnson")] {
        let student = Student::new(
            StudentId::new(id),
            format!("S{id:03}"),
            first,
            last,
            "Computer Science",
            fixed_now(),
        )
        .unwrap();
        repo.upsert_account(&Account::Student(student)).await.unwrap();
    }
}

#[tokio::test]
async fn full_flow_from_sitting_to_leaderboard() {
    let repo = InMemoryRepository::new();
    seed_portal(&repo).await;

    let run = TestRunService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
    .with_shuffle_questions(false);

    // John answers everything correctly on test 1.
    let mut session = run.start(TestId::new(1)).await.unwrap();
    loop {
        session.select_option(0).unwrap();
        if !session.next() {
            break;
        }
    }
    let john = run.submit(&mut session, StudentId::new(1)).await.unwrap();
    assert_eq!(john.attempt.percentage(), 100.0);
    assert_eq!(john.attempt.points_earned(), 90);

    // Sarah gets two right and one wrong on the same test.
    let mut session = run.start(TestId::new(1)).await.unwrap();
    session.select_option(0).unwrap();
    session.next();
    session.select_option(0).unwrap();
    session.next();
    session.select_option(2).unwrap();
    let sarah = run.submit(&mut session, StudentId::new(2)).await.unwrap();
    assert_eq!(sarah.attempt.correct_count(), 2);
    assert_eq!(sarah.attempt.points_earned(), 2 * 30 - 10);

    // Sarah also completes test 2, in another subject.
    let mut session = run.start(TestId::new(2)).await.unwrap();
    session.select_option(0).unwrap();
    run.submit(&mut session, StudentId::new(2)).await.unwrap();

    let dashboard = DashboardService::new(Arc::new(repo.clone()), Arc::new(repo.clone()));
    let metrics = dashboard.metrics(StudentId::new(2)).await.unwrap();
    assert_eq!(metrics.tests_completed, 2);
    assert_eq!(metrics.total_points, 50 + 30);

    let todo = dashboard.todo_tests(StudentId::new(1)).await.unwrap();
    assert_eq!(todo.len(), 1);
    assert_eq!(todo[0].id(), TestId::new(2));

    let leaderboard = LeaderboardService::new(
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );
    let entries = leaderboard.leaderboard(5).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].subject_name, "Object-Oriented Programming");
    assert_eq!(entries[0].standings[0].display_name, "John Smith");
    assert_eq!(entries[0].standings[0].total_points, 90);
    assert_eq!(entries[0].standings[1].total_points, 50);
    assert_eq!(entries[1].subject_name, "Data Structures");
    assert_eq!(entries[1].standings.len(), 1);
}

#[tokio::test]
async fn retake_updates_dashboard_and_leaderboard() {
    let repo = InMemoryRepository::new();
    seed_portal(&repo).await;

    let run = TestRunService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
    .with_shuffle_questions(false);

    let mut first = run.start(TestId::new(1)).await.unwrap();
    loop {
        first.select_option(0).unwrap();
        if !first.next() {
            break;
        }
    }
    let first_outcome = run.submit(&mut first, StudentId::new(1)).await.unwrap();

    let mut retake = run.start(TestId::new(1)).await.unwrap();
    retake.select_option(3).unwrap();
    let retake_outcome = run.submit(&mut retake, StudentId::new(1)).await.unwrap();

    assert_eq!(first_outcome.row_id, retake_outcome.row_id);

    let dashboard = DashboardService::new(Arc::new(repo.clone()), Arc::new(repo.clone()));
    let metrics = dashboard.metrics(StudentId::new(1)).await.unwrap();
    assert_eq!(metrics.tests_completed, 1);
    assert_eq!(metrics.total_points, 0);
    assert_eq!(metrics.average_percentage, 0.0);

    let history = dashboard.completed_tests(StudentId::new(1)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].correct_count, 0);

    let leaderboard = LeaderboardService::new(
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );
    let entries = leaderboard.leaderboard(5).await.unwrap();
    assert_eq!(entries[0].standings[0].total_points, 0);
}
