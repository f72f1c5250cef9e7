//! Enrollments owned by a student.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use student_store::{DisenrollmentRecord, EnrollmentRecord};

use super::{Course, Grade, GradeParseError};

/// 1-based position of an enrollment within its student.
///
/// Numbers are derived from position when read, so removing an enrollment
/// shifts every later enrollment down by one. They are not identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentNumber(usize);

impl EnrollmentNumber {
    /// Creates an enrollment number from a raw value.
    ///
    /// Zero is accepted but never resolves to an enrollment.
    pub fn new(value: usize) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn get(&self) -> usize {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index + 1)
    }

    pub(crate) fn index(&self) -> Option<usize> {
        self.0.checked_sub(1)
    }
}

impl std::fmt::Display for EnrollmentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for EnrollmentNumber {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// A student's enrollment in a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    course: Course,
    grade: Grade,
}

impl Enrollment {
    pub(crate) fn new(course: Course, grade: Grade) -> Self {
        Self { course, grade }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub(crate) fn update(&mut self, course: Course, grade: Grade) {
        self.course = course;
        self.grade = grade;
    }
}

impl TryFrom<EnrollmentRecord> for Enrollment {
    type Error = GradeParseError;

    fn try_from(record: EnrollmentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            grade: record.grade.parse()?,
            course: record.course.into(),
        })
    }
}

impl From<&Enrollment> for EnrollmentRecord {
    fn from(enrollment: &Enrollment) -> Self {
        EnrollmentRecord {
            course: (&enrollment.course).into(),
            grade: enrollment.grade.to_string(),
        }
    }
}

/// Record of a removed enrollment and why it was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disenrollment {
    course: Course,
    comment: String,
    disenrolled_at: DateTime<Utc>,
}

impl Disenrollment {
    pub(crate) fn new(course: Course, comment: impl Into<String>) -> Self {
        Self {
            course,
            comment: comment.into(),
            disenrolled_at: Utc::now(),
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn disenrolled_at(&self) -> DateTime<Utc> {
        self.disenrolled_at
    }
}

impl From<DisenrollmentRecord> for Disenrollment {
    fn from(record: DisenrollmentRecord) -> Self {
        Self {
            course: record.course.into(),
            comment: record.comment,
            disenrolled_at: record.disenrolled_at,
        }
    }
}

impl From<&Disenrollment> for DisenrollmentRecord {
    fn from(disenrollment: &Disenrollment) -> Self {
        DisenrollmentRecord {
            course: (&disenrollment.course).into(),
            comment: disenrollment.comment.clone(),
            disenrolled_at: disenrollment.disenrolled_at,
        }
    }
}
