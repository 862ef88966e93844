use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{LecturerId, StudentId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountError {
    #[error("student number cannot be empty")]
    EmptyStudentNumber,

    #[error("first and last name cannot be empty")]
    EmptyName,
}

//
// ─── ROLES ─────────────────────────────────────────────────────────────────────
//

/// The roles the portal distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Lecturer,
    Admin,
}

//
// ─── STUDENT ───────────────────────────────────────────────────────────────────
//

/// A student account. Credentials and login bookkeeping live with the
/// authentication collaborator; this carries what scoring, leaderboard, and
/// dashboard reads need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    student_number: String,
    first_name: String,
    last_name: String,
    course_title: String,
    is_approved: bool,
    created_at: DateTime<Utc>,
}

impl Student {
    /// Build a freshly registered student. New accounts start unapproved.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` when the student number or either name is empty.
    pub fn new(
        id: StudentId,
        student_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        course_title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AccountError> {
        Self::from_persisted(
            id,
            student_number,
            first_name,
            last_name,
            course_title,
            false,
            created_at,
        )
    }

    /// Rehydrate a student from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` when the student number or either name is empty.
    pub fn from_persisted(
        id: StudentId,
        student_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        course_title: impl Into<String>,
        is_approved: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AccountError> {
        let student_number = student_number.into();
        let first_name = first_name.into();
        let last_name = last_name.into();
        if student_number.trim().is_empty() {
            return Err(AccountError::EmptyStudentNumber);
        }
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(AccountError::EmptyName);
        }

        Ok(Self {
            id,
            student_number,
            first_name,
            last_name,
            course_title: course_title.into(),
            is_approved,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> StudentId {
        self.id
    }

    #[must_use]
    pub fn student_number(&self) -> &str {
        &self.student_number
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.is_approved
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Combined name for display surfaces.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn approve(&mut self) {
        self.is_approved = true;
    }
}

//
// ─── LECTURER ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecturer {
    id: LecturerId,
    first_name: String,
    last_name: String,
}

impl Lecturer {
    /// # Errors
    ///
    /// Returns `AccountError::EmptyName` when either name is empty.
    pub fn new(
        id: LecturerId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, AccountError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(AccountError::EmptyName);
        }

        Ok(Self {
            id,
            first_name,
            last_name,
        })
    }

    #[must_use]
    pub fn id(&self) -> LecturerId {
        self.id
    }

    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

//
// ─── ACCOUNT ───────────────────────────────────────────────────────────────────
//

/// A portal account, tagged by role.
///
/// Admins carry the same data as lecturers. Role-specific fields live in the
/// variant payloads instead of an inheritance tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Account {
    Student(Student),
    Lecturer(Lecturer),
    Admin(Lecturer),
}

impl Account {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Account::Student(_) => Role::Student,
            Account::Lecturer(_) => Role::Lecturer,
            Account::Admin(_) => Role::Admin,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Account::Student(student) => student.full_name(),
            Account::Lecturer(staff) | Account::Admin(staff) => staff.full_name(),
        }
    }

    #[must_use]
    pub fn as_student(&self) -> Option<&Student> {
        match self {
            Account::Student(student) => Some(student),
            _ => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
