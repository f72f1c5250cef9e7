//! Catalog courses as seen by the student aggregate.

use common::CourseId;
use student_store::CourseRecord;

/// A course from the catalog. Students reference courses; they never own them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: String,
    credits: i32,
}

impl Course {
    pub fn new(id: CourseId, name: impl Into<String>, credits: i32) -> Self {
        Self {
            id,
            name: name.into(),
            credits,
        }
    }

    pub fn id(&self) -> CourseId {
        self.id
    }

    /// The unique course name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credits(&self) -> i32 {
        self.credits
    }
}

impl From<CourseRecord> for Course {
    fn from(record: CourseRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            credits: record.credits,
        }
    }
}

impl From<&Course> for CourseRecord {
    fn from(course: &Course) -> Self {
        CourseRecord {
            id: course.id,
            name: course.name.clone(),
            credits: course.credits,
        }
    }
}
