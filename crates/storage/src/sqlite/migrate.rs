use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema (accounts, tests, questions, test attempts, and
/// indexes).
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS accounts (
                    id INTEGER NOT NULL,
                    role TEXT NOT NULL CHECK (role IN ('student', 'lecturer', 'admin')),
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    student_number TEXT,
                    course_title TEXT,
                    is_approved INTEGER,
                    created_at TEXT,
                    PRIMARY KEY (id, role)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS tests (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    subject_name TEXT NOT NULL,
                    lecturer_id INTEGER NOT NULL,
                    question_count INTEGER NOT NULL CHECK (question_count > 0),
                    created_at TEXT NOT NULL,
                    is_active INTEGER NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS questions (
                    id INTEGER NOT NULL,
                    test_id INTEGER NOT NULL,
                    prompt TEXT NOT NULL,
                    options TEXT NOT NULL,
                    correct_answer_index INTEGER NOT NULL CHECK (correct_answer_index >= 0),
                    points INTEGER NOT NULL CHECK (points > 0),
                    PRIMARY KEY (id, test_id),
                    FOREIGN KEY (test_id) REFERENCES tests(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        // No foreign key to tests: attempts outlive a deleted test and read
        // paths skip rows they can no longer resolve.
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS test_attempts (
                    id INTEGER PRIMARY KEY,
                    student_id INTEGER NOT NULL,
                    test_id INTEGER NOT NULL,
                    completed_at TEXT NOT NULL,
                    correct_count INTEGER NOT NULL CHECK (correct_count >= 0),
                    total_questions INTEGER NOT NULL CHECK (total_questions > 0),
                    points_earned INTEGER NOT NULL CHECK (points_earned >= 0),
                    percentage REAL NOT NULL,
                    UNIQUE (student_id, test_id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_questions_test
                    ON questions (test_id, id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_test_attempts_student
                    ON test_attempts (student_id, id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
