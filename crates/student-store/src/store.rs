use async_trait::async_trait;

use crate::{CourseRecord, Result, StoreError, StudentId, StudentRecord};

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Ids of every student written by the unit of work, including ids
    /// assigned to new students during the commit.
    pub saved: Vec<StudentId>,

    /// Number of students deleted.
    pub deleted: usize,
}

/// Source of units of work.
///
/// Implementations must be cheap to share between tasks.
#[async_trait]
pub trait Database: Send + Sync {
    /// The transactional session handed out by [`Database::begin`].
    type UnitOfWork: UnitOfWork;

    /// Opens a new unit of work.
    async fn begin(&self) -> Result<Self::UnitOfWork>;
}

/// A transactional session over the student and course tables.
///
/// Writes are atomic: either every staged save and delete is applied by
/// [`UnitOfWork::commit`], or none are. Dropping a unit of work without
/// committing discards its writes.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Loads a student and everything it owns.
    async fn student_by_id(&mut self, id: StudentId) -> Result<Option<StudentRecord>>;

    /// Loads every student, ordered by id.
    async fn all_students(&mut self) -> Result<Vec<StudentRecord>>;

    /// Looks up a course by its unique name.
    async fn course_by_name(&mut self, name: &str) -> Result<Option<CourseRecord>>;

    /// Stages an insert (record without id) or a full replacement of an
    /// existing student's data, enrollments and disenrollments.
    async fn save_student(&mut self, student: StudentRecord) -> Result<()>;

    /// Stages the deletion of a student and everything it owns.
    async fn delete_student(&mut self, id: StudentId) -> Result<()>;

    /// Atomically applies everything staged in this unit of work.
    async fn commit(self) -> Result<CommitSummary>;
}

/// Validates a student record before it is staged.
pub fn validate_student_record(student: &StudentRecord) -> std::result::Result<(), StoreError> {
    if student.name.trim().is_empty() {
        return Err(StoreError::InvalidRecord(
            "Student name must not be empty".to_string(),
        ));
    }

    if student.email.trim().is_empty() {
        return Err(StoreError::InvalidRecord(
            "Student email must not be empty".to_string(),
        ));
    }

    if let Some(enrollment) = student
        .enrollments
        .iter()
        .find(|e| e.course.name.is_empty() || e.grade.is_empty())
    {
        return Err(StoreError::InvalidRecord(format!(
            "Enrollment in course '{}' is incomplete",
            enrollment.course.name
        )));
    }

    Ok(())
}
