use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CourseId, StudentId};

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: CourseId,
    pub name: String,
    pub credits: i32,
}

/// A stored enrollment. Its position in [`StudentRecord::enrollments`] is
/// its order within the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub course: CourseRecord,
    /// Grade letter as text (`"A"` .. `"F"`).
    pub grade: String,
}

/// Audit entry left behind when an enrollment is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisenrollmentRecord {
    pub course: CourseRecord,
    pub comment: String,
    pub disenrolled_at: DateTime<Utc>,
}

/// A student together with everything the student owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// `None` until the record is first committed.
    pub id: Option<StudentId>,
    pub name: String,
    pub email: String,
    pub enrollments: Vec<EnrollmentRecord>,
    pub disenrollments: Vec<DisenrollmentRecord>,
}

impl StudentRecord {
    /// Creates a record for a student that has not been persisted yet.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            enrollments: Vec::new(),
            disenrollments: Vec::new(),
        }
    }

    /// Returns true if the record has never been committed.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
