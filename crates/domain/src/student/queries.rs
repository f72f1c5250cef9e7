//! Student queries and their read-only projections.

use common::StudentId;
use serde::Serialize;
use student_store::{StoreError, StudentRecord};

use crate::message::{Message, Query};

use super::EnrollmentNumber;

/// Query for the student list.
#[derive(Debug, Clone, Default)]
pub struct GetListQuery {
    /// Keep only students enrolled in this course.
    pub enrolled: Option<String>,

    /// Keep only students with exactly this many enrollments.
    pub number: Option<usize>,
}

impl GetListQuery {
    pub fn new(enrolled: Option<String>, number: Option<usize>) -> Self {
        Self { enrolled, number }
    }

    /// Query for every student.
    pub fn all() -> Self {
        Self::default()
    }

    pub(crate) fn matches(&self, student: &StudentRecord) -> bool {
        let enrolled_ok = self.enrolled.as_deref().is_none_or(|course| {
            student
                .enrollments
                .iter()
                .any(|enrollment| enrollment.course.name == course)
        });
        let number_ok = self
            .number
            .is_none_or(|number| student.enrollments.len() == number);

        enrolled_ok && number_ok
    }
}

impl Message for GetListQuery {
    type Output = Result<Vec<StudentSummary>, StoreError>;
    const NAME: &'static str = "GetList";
}

impl Query for GetListQuery {}

/// Read-only view of one enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentSummary {
    pub number: EnrollmentNumber,
    pub course: String,
    pub grade: String,
    pub credits: i32,
}

/// Read-only view of a student returned by [`GetListQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSummary {
    pub id: Option<StudentId>,
    pub name: String,
    pub email: String,
    pub enrollments: Vec<EnrollmentSummary>,
}

impl From<StudentRecord> for StudentSummary {
    fn from(record: StudentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            enrollments: record
                .enrollments
                .into_iter()
                .enumerate()
                .map(|(index, enrollment)| EnrollmentSummary {
                    number: EnrollmentNumber::from_index(index),
                    course: enrollment.course.name,
                    grade: enrollment.grade,
                    credits: enrollment.course.credits,
                })
                .collect(),
        }
    }
}
