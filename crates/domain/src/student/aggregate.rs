//! Student aggregate implementation.

use common::StudentId;
use student_store::StudentRecord;

use super::{
    Course, Disenrollment, Enrollment, EnrollmentNumber, Grade, GradeParseError, StudentError,
};

/// Student aggregate root.
///
/// Owns its enrollments in insertion order together with the audit trail
/// of removed enrollments. All changes to enrollments go through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Assigned by the store on first commit.
    id: Option<StudentId>,
    name: String,
    email: String,
    enrollments: Vec<Enrollment>,
    disenrollments: Vec<Disenrollment>,
}

// Query methods
impl Student {
    /// Returns the student ID, if the student has been persisted.
    pub fn id(&self) -> Option<StudentId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the enrollments paired with their current numbers, in order.
    pub fn enrollments(&self) -> impl Iterator<Item = (EnrollmentNumber, &Enrollment)> {
        self.enrollments
            .iter()
            .enumerate()
            .map(|(index, enrollment)| (EnrollmentNumber::from_index(index), enrollment))
    }

    /// Returns the enrollment currently holding `number`.
    pub fn enrollment(&self, number: EnrollmentNumber) -> Option<&Enrollment> {
        number.index().and_then(|index| self.enrollments.get(index))
    }

    /// Returns the number of enrollments.
    pub fn enrollment_count(&self) -> usize {
        self.enrollments.len()
    }

    /// Returns true if the student is enrolled in the named course.
    pub fn is_enrolled_in(&self, course_name: &str) -> bool {
        self.enrollments
            .iter()
            .any(|enrollment| enrollment.course().name() == course_name)
    }

    /// Returns the removed enrollments, oldest first.
    pub fn disenrollments(&self) -> &[Disenrollment] {
        &self.disenrollments
    }
}

// Command methods
impl Student {
    /// Creates a student with no enrollments.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, StudentError> {
        let name = name.into();
        let email = email.into();
        validate_personal_info(&name, &email)?;

        Ok(Self {
            id: None,
            name,
            email,
            enrollments: Vec::new(),
            disenrollments: Vec::new(),
        })
    }

    /// Enrolls the student in `course` and returns the new enrollment's number.
    pub fn enroll(&mut self, course: Course, grade: Grade) -> EnrollmentNumber {
        self.enrollments.push(Enrollment::new(course, grade));
        EnrollmentNumber::from_index(self.enrollments.len() - 1)
    }

    /// Moves an enrollment to another course and/or grade in place.
    ///
    /// The enrollment keeps its number.
    pub fn transfer_enrollment(
        &mut self,
        number: EnrollmentNumber,
        course: Course,
        grade: Grade,
    ) -> Result<(), StudentError> {
        let enrollment = number
            .index()
            .and_then(|index| self.enrollments.get_mut(index))
            .ok_or(StudentError::EnrollmentNotFound { number })?;

        enrollment.update(course, grade);
        Ok(())
    }

    /// Removes an enrollment, recording `comment` as the reason.
    ///
    /// Later enrollments move up one number. Fails without changing anything
    /// when the comment is blank or the number does not resolve.
    pub fn remove_enrollment(
        &mut self,
        number: EnrollmentNumber,
        comment: &str,
    ) -> Result<&Disenrollment, StudentError> {
        if comment.trim().is_empty() {
            return Err(StudentError::DisenrollmentCommentRequired);
        }

        let index = number
            .index()
            .filter(|index| *index < self.enrollments.len())
            .ok_or(StudentError::EnrollmentNotFound { number })?;

        let removed = self.enrollments.remove(index);
        self.disenrollments
            .push(Disenrollment::new(removed.course().clone(), comment));

        Ok(&self.disenrollments[self.disenrollments.len() - 1])
    }

    /// Replaces the student's name and email.
    pub fn edit_personal_info(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<(), StudentError> {
        let name = name.into();
        let email = email.into();
        validate_personal_info(&name, &email)?;

        self.name = name;
        self.email = email;
        Ok(())
    }
}

fn validate_personal_info(name: &str, email: &str) -> Result<(), StudentError> {
    if name.trim().is_empty() {
        return Err(StudentError::NameRequired);
    }
    if email.trim().is_empty() {
        return Err(StudentError::EmailRequired);
    }
    Ok(())
}

impl TryFrom<StudentRecord> for Student {
    type Error = GradeParseError;

    fn try_from(record: StudentRecord) -> Result<Self, Self::Error> {
        let enrollments = record
            .enrollments
            .into_iter()
            .map(Enrollment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: record.id,
            name: record.name,
            email: record.email,
            enrollments,
            disenrollments: record
                .disenrollments
                .into_iter()
                .map(Disenrollment::from)
                .collect(),
        })
    }
}

impl From<&Student> for StudentRecord {
    fn from(student: &Student) -> Self {
        StudentRecord {
            id: student.id,
            name: student.name.clone(),
            email: student.email.clone(),
            enrollments: student.enrollments.iter().map(Into::into).collect(),
            disenrollments: student.disenrollments.iter().map(Into::into).collect(),
        }
    }
}
