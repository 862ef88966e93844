use portal_core::model::{Account, LecturerId, Student, StudentId};

use super::SqliteRepository;
use super::mapping::{id_i64, map_account_row, role_as_str};
use crate::repository::{DirectoryRepository, StorageError};

#[async_trait::async_trait]
impl DirectoryRepository for SqliteRepository {
    async fn upsert_account(&self, account: &Account) -> Result<(), StorageError> {
        let role = role_as_str(account.role());
        let (id, first_name, last_name, student_number, course_title, is_approved, created_at) =
            match account {
                Account::Student(student) => (
                    id_i64("student_id", student.id().value())?,
                    student.first_name().to_owned(),
                    student.last_name().to_owned(),
                    Some(student.student_number().to_owned()),
                    Some(student.course_title().to_owned()),
                    Some(i64::from(student.is_approved())),
                    Some(student.created_at()),
                ),
                Account::Lecturer(staff) | Account::Admin(staff) => (
                    id_i64("lecturer_id", staff.id().value())?,
                    staff.first_name().to_owned(),
                    staff.last_name().to_owned(),
                    None,
                    None,
                    None,
                    None,
                ),
            };

        sqlx::query(
            r"
            INSERT INTO accounts (
                id, role, first_name, last_name, student_number,
                course_title, is_approved, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id, role) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                student_number = excluded.student_number,
                course_title = excluded.course_title,
                is_approved = excluded.is_approved
            ",
        )
        .bind(id)
        .bind(role)
        .bind(first_name)
        .bind(last_name)
        .bind(student_number)
        .bind(course_title)
        .bind(is_approved)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, role, first_name, last_name, student_number,
                   course_title, is_approved, created_at
            FROM accounts
            WHERE id = ?1 AND role = 'student'
            ",
        )
        .bind(id_i64("student_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => {
                let account = map_account_row(&row)?;
                match account {
                    Account::Student(student) => Ok(Some(student)),
                    _ => Err(StorageError::Serialization("expected student row".into())),
                }
            }
            None => Ok(None),
        }
    }

    async fn get_staff(&self, id: LecturerId) -> Result<Option<Account>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, role, first_name, last_name, student_number,
                   course_title, is_approved, created_at
            FROM accounts
            WHERE id = ?1 AND role IN ('lecturer', 'admin')
            ",
        )
        .bind(id_i64("lecturer_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_account_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_students(&self) -> Result<Vec<Student>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, role, first_name, last_name, student_number,
                   course_title, is_approved, created_at
            FROM accounts
            WHERE role = 'student'
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut students = Vec::with_capacity(rows.len());
        for row in rows {
            match map_account_row(&row)? {
                Account::Student(student) => students.push(student),
                _ => return Err(StorageError::Serialization("expected student row".into())),
            }
        }
        Ok(students)
    }
}
