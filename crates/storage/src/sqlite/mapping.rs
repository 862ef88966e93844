use portal_core::model::{
    Account, AttemptResult, Lecturer, LecturerId, Question, QuestionId, Role, Student, StudentId,
    TestDefinition, TestId,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn usize_from_i64(field: &'static str, v: i64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn student_id_from_i64(v: i64) -> Result<StudentId, StorageError> {
    Ok(StudentId::new(i64_to_u64("student_id", v)?))
}

pub(crate) fn lecturer_id_from_i64(v: i64) -> Result<LecturerId, StorageError> {
    Ok(LecturerId::new(i64_to_u64("lecturer_id", v)?))
}

pub(crate) fn test_id_from_i64(v: i64) -> Result<TestId, StorageError> {
    Ok(TestId::new(i64_to_u64("test_id", v)?))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

/// Converts a `Role` to its storage representation.
/// This must stay consistent with `parse_role`.
pub(crate) fn role_as_str(role: Role) -> &'static str {
    match role {
        Role::Student => "student",
        Role::Lecturer => "lecturer",
        Role::Admin => "admin",
    }
}

pub(crate) fn parse_role(s: &str) -> Result<Role, StorageError> {
    match s {
        "student" => Ok(Role::Student),
        "lecturer" => Ok(Role::Lecturer),
        "admin" => Ok(Role::Admin),
        _ => Err(StorageError::Serialization(format!("invalid role: {s}"))),
    }
}

pub(crate) fn map_test_row(row: &sqlx::sqlite::SqliteRow) -> Result<TestDefinition, StorageError> {
    let mut test = TestDefinition::new(
        test_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("subject_name").map_err(ser)?,
        lecturer_id_from_i64(row.try_get::<i64, _>("lecturer_id").map_err(ser)?)?,
        u32_from_i64(
            "question_count",
            row.try_get::<i64, _>("question_count").map_err(ser)?,
        )?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)?;

    test.set_active(row.try_get::<i64, _>("is_active").map_err(ser)? != 0);
    Ok(test)
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let options: Vec<String> =
        serde_json::from_str(row.try_get::<String, _>("options").map_err(ser)?.as_str())
            .map_err(ser)?;

    Question::new(
        question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        test_id_from_i64(row.try_get::<i64, _>("test_id").map_err(ser)?)?,
        row.try_get::<String, _>("prompt").map_err(ser)?,
        options,
        usize_from_i64(
            "correct_answer_index",
            row.try_get::<i64, _>("correct_answer_index").map_err(ser)?,
        )?,
        u32_from_i64("points", row.try_get::<i64, _>("points").map_err(ser)?)?,
    )
    .map_err(ser)
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptResult, StorageError> {
    AttemptResult::from_persisted(
        student_id_from_i64(row.try_get::<i64, _>("student_id").map_err(ser)?)?,
        test_id_from_i64(row.try_get::<i64, _>("test_id").map_err(ser)?)?,
        row.try_get("completed_at").map_err(ser)?,
        u32_from_i64(
            "correct_count",
            row.try_get::<i64, _>("correct_count").map_err(ser)?,
        )?,
        u32_from_i64(
            "total_questions",
            row.try_get::<i64, _>("total_questions").map_err(ser)?,
        )?,
        u32_from_i64(
            "points_earned",
            row.try_get::<i64, _>("points_earned").map_err(ser)?,
        )?,
        row.try_get::<f64, _>("percentage").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_account_row(row: &sqlx::sqlite::SqliteRow) -> Result<Account, StorageError> {
    let role_str: String = row.try_get("role").map_err(ser)?;
    let role = parse_role(role_str.as_str())?;
    let id: i64 = row.try_get("id").map_err(ser)?;
    let first_name: String = row.try_get("first_name").map_err(ser)?;
    let last_name: String = row.try_get("last_name").map_err(ser)?;

    match role {
        Role::Student => {
            let student = Student::from_persisted(
                student_id_from_i64(id)?,
                row.try_get::<Option<String>, _>("student_number")
                    .map_err(ser)?
                    .ok_or_else(|| StorageError::Serialization("missing student_number".into()))?,
                first_name,
                last_name,
                row.try_get::<Option<String>, _>("course_title")
                    .map_err(ser)?
                    .unwrap_or_default(),
                row.try_get::<Option<i64>, _>("is_approved")
                    .map_err(ser)?
                    .unwrap_or(0)
                    != 0,
                row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>("created_at")
                    .map_err(ser)?
                    .ok_or_else(|| StorageError::Serialization("missing created_at".into()))?,
            )
            .map_err(ser)?;
            Ok(Account::Student(student))
        }
        Role::Lecturer | Role::Admin => {
            let staff =
                Lecturer::new(lecturer_id_from_i64(id)?, first_name, last_name).map_err(ser)?;
            Ok(match role {
                Role::Admin => Account::Admin(staff),
                _ => Account::Lecturer(staff),
            })
        }
    }
}
