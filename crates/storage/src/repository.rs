use async_trait::async_trait;
use portal_core::model::{
    Account, AttemptResult, LecturerId, Question, QuestionId, Student, StudentId, TestDefinition,
    TestId,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored attempt together with its row identity.
///
/// The row id is assigned on first insert for a `(student, test)` pair and
/// survives retakes; listing in id order therefore reproduces first-submission
/// order across backends.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRow {
    pub id: i64,
    pub result: AttemptResult,
}

impl AttemptRow {
    #[must_use]
    pub fn new(id: i64, result: AttemptResult) -> Self {
        Self { id, result }
    }
}

/// Repository contract for test definitions.
#[async_trait]
pub trait TestRepository: Send + Sync {
    /// Persist or update a test definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the test cannot be stored.
    async fn upsert_test(&self, test: &TestDefinition) -> Result<(), StorageError>;

    /// Fetch a test by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures; a missing test is `Ok(None)`.
    async fn get_test(&self, id: TestId) -> Result<Option<TestDefinition>, StorageError>;

    /// List all active tests in id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_active_tests(&self) -> Result<Vec<TestDefinition>, StorageError>;
}

/// Repository contract for a test's question pool.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist or update a question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Fetch a test's full question pool in id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn questions_for_test(&self, test_id: TestId) -> Result<Vec<Question>, StorageError>;
}

/// Repository contract for the attempt ledger.
///
/// Holds at most one row per `(student, test)` pair; a resubmission
/// overwrites the stored fields in place and keeps the row id. The upsert is
/// atomic: concurrent readers observe either the previous row or the new one.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Insert a new attempt or overwrite the existing one for the same
    /// `(student, test)` pair. Returns the row id, which is stable across
    /// retakes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn upsert_attempt(&self, attempt: &AttemptResult) -> Result<i64, StorageError>;

    /// Fetch the current attempt for a `(student, test)` pair, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_attempt(
        &self,
        student_id: StudentId,
        test_id: TestId,
    ) -> Result<Option<AttemptResult>, StorageError>;

    /// All current attempts for one student, in row-id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn attempts_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<AttemptResult>, StorageError>;

    /// All current attempts across students, with row ids, in row-id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_attempt_rows(&self) -> Result<Vec<AttemptRow>, StorageError>;
}

/// Repository contract for portal accounts.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Persist or update an account under its role-specific id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the account cannot be stored.
    async fn upsert_account(&self, account: &Account) -> Result<(), StorageError>;

    /// Fetch a student account by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures; a missing student is `Ok(None)`.
    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, StorageError>;

    /// Fetch a lecturer or admin account by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures; a missing account is `Ok(None)`.
    async fn get_staff(&self, id: LecturerId) -> Result<Option<Account>, StorageError>;

    /// All student accounts in id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_students(&self) -> Result<Vec<Student>, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

#[derive(Default)]
struct AttemptStore {
    // Keyed by row id so iteration is insertion order, matching SQLite.
    rows: BTreeMap<i64, AttemptResult>,
    index: HashMap<(StudentId, TestId), i64>,
    next_id: i64,
}

impl AttemptStore {
    fn upsert(&mut self, attempt: &AttemptResult) -> i64 {
        let key = (attempt.student_id(), attempt.test_id());
        if let Some(&id) = self.index.get(&key) {
            self.rows.insert(id, attempt.clone());
            return id;
        }
        self.next_id += 1;
        let id = self.next_id;
        self.index.insert(key, id);
        self.rows.insert(id, attempt.clone());
        id
    }
}

#[derive(Default)]
struct DirectoryStore {
    students: BTreeMap<StudentId, Student>,
    staff: BTreeMap<LecturerId, Account>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tests: Arc<Mutex<BTreeMap<TestId, TestDefinition>>>,
    questions: Arc<Mutex<BTreeMap<(TestId, QuestionId), Question>>>,
    attempts: Arc<Mutex<AttemptStore>>,
    directory: Arc<Mutex<DirectoryStore>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl TestRepository for InMemoryRepository {
    async fn upsert_test(&self, test: &TestDefinition) -> Result<(), StorageError> {
        let mut guard = self.tests.lock().map_err(lock_err)?;
        guard.insert(test.id(), test.clone());
        Ok(())
    }

    async fn get_test(&self, id: TestId) -> Result<Option<TestDefinition>, StorageError> {
        let guard = self.tests.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_active_tests(&self) -> Result<Vec<TestDefinition>, StorageError> {
        let guard = self.tests.lock().map_err(lock_err)?;
        Ok(guard.values().filter(|t| t.is_active()).cloned().collect())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self.questions.lock().map_err(lock_err)?;
        guard.insert((question.test_id(), question.id()), question.clone());
        Ok(())
    }

    async fn questions_for_test(&self, test_id: TestId) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(lock_err)?;
        Ok(guard
            .range((test_id, QuestionId::new(0))..=(test_id, QuestionId::new(u64::MAX)))
            .map(|(_, q)| q.clone())
            .collect())
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn upsert_attempt(&self, attempt: &AttemptResult) -> Result<i64, StorageError> {
        let mut guard = self.attempts.lock().map_err(lock_err)?;
        Ok(guard.upsert(attempt))
    }

    async fn get_attempt(
        &self,
        student_id: StudentId,
        test_id: TestId,
    ) -> Result<Option<AttemptResult>, StorageError> {
        let guard = self.attempts.lock().map_err(lock_err)?;
        let id = guard.index.get(&(student_id, test_id));
        Ok(id.and_then(|id| guard.rows.get(id)).cloned())
    }

    async fn attempts_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<AttemptResult>, StorageError> {
        let guard = self.attempts.lock().map_err(lock_err)?;
        Ok(guard
            .rows
            .values()
            .filter(|a| a.student_id() == student_id)
            .cloned()
            .collect())
    }

    async fn list_attempt_rows(&self) -> Result<Vec<AttemptRow>, StorageError> {
        let guard = self.attempts.lock().map_err(lock_err)?;
        Ok(guard
            .rows
            .iter()
            .map(|(&id, result)| AttemptRow::new(id, result.clone()))
            .collect())
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryRepository {
    async fn upsert_account(&self, account: &Account) -> Result<(), StorageError> {
        let mut guard = self.directory.lock().map_err(lock_err)?;
        match account {
            Account::Student(student) => {
                guard.students.insert(student.id(), student.clone());
            }
            Account::Lecturer(staff) | Account::Admin(staff) => {
                guard.staff.insert(staff.id(), account.clone());
            }
        }
        Ok(())
    }

    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, StorageError> {
        let guard = self.directory.lock().map_err(lock_err)?;
        Ok(guard.students.get(&id).cloned())
    }

    async fn get_staff(&self, id: LecturerId) -> Result<Option<Account>, StorageError> {
        let guard = self.directory.lock().map_err(lock_err)?;
        Ok(guard.staff.get(&id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>, StorageError> {
        let guard = self.directory.lock().map_err(lock_err)?;
        Ok(guard.students.values().cloned().collect())
    }
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates the portal repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub tests: Arc<dyn TestRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub directory: Arc<dyn DirectoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            tests: Arc::new(repo.clone()),
            questions: Arc::new(repo.clone()),
            attempts: Arc::new(repo.clone()),
            directory: Arc::new(repo),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
