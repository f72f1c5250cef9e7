//! Student commands.

use common::StudentId;

use crate::message::{Command, CommandResult, Message};

/// Command to register a new student with up to two initial enrollments.
///
/// A course is applied only when both its name and grade are given.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub course1: Option<String>,
    pub course1_grade: Option<String>,
    pub course2: Option<String>,
    pub course2_grade: Option<String>,
}

impl RegisterCommand {
    /// Creates a new RegisterCommand.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        course1: Option<String>,
        course1_grade: Option<String>,
        course2: Option<String>,
        course2_grade: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            course1,
            course1_grade,
            course2,
            course2_grade,
        }
    }

    /// Creates a RegisterCommand without initial enrollments.
    pub fn without_courses(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email, None, None, None, None)
    }
}

impl Message for RegisterCommand {
    type Output = CommandResult;
    const NAME: &'static str = "Register";
}

impl Command for RegisterCommand {}

/// Command to delete a student and everything the student owns.
#[derive(Debug, Clone)]
pub struct UnregisterCommand {
    pub student_id: StudentId,
}

impl UnregisterCommand {
    pub fn new(student_id: StudentId) -> Self {
        Self { student_id }
    }
}

impl Message for UnregisterCommand {
    type Output = CommandResult;
    const NAME: &'static str = "Unregister";
}

impl Command for UnregisterCommand {}

/// Command to replace a student's name and email.
#[derive(Debug, Clone)]
pub struct EditPersonalInfoCommand {
    pub student_id: StudentId,
    pub name: String,
    pub email: String,
}

impl EditPersonalInfoCommand {
    pub fn new(student_id: StudentId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            student_id,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Message for EditPersonalInfoCommand {
    type Output = CommandResult;
    const NAME: &'static str = "EditPersonalInfo";
}

impl Command for EditPersonalInfoCommand {}

/// Command to enroll an existing student in a course.
#[derive(Debug, Clone)]
pub struct EnrollCommand {
    pub student_id: StudentId,
    pub course: String,
    pub grade: String,
}

impl EnrollCommand {
    pub fn new(student_id: StudentId, course: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            student_id,
            course: course.into(),
            grade: grade.into(),
        }
    }
}

impl Message for EnrollCommand {
    type Output = CommandResult;
    const NAME: &'static str = "Enroll";
}

impl Command for EnrollCommand {}

/// Command to move an enrollment to another course and grade.
#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub student_id: StudentId,
    /// 1-based enrollment number as currently assigned.
    pub enrollment_number: usize,
    pub course: String,
    pub grade: String,
}

impl TransferCommand {
    pub fn new(
        student_id: StudentId,
        enrollment_number: usize,
        course: impl Into<String>,
        grade: impl Into<String>,
    ) -> Self {
        Self {
            student_id,
            enrollment_number,
            course: course.into(),
            grade: grade.into(),
        }
    }
}

impl Message for TransferCommand {
    type Output = CommandResult;
    const NAME: &'static str = "Transfer";
}

impl Command for TransferCommand {}

/// Command to remove an enrollment with a justification.
#[derive(Debug, Clone)]
pub struct DisenrollCommand {
    pub student_id: StudentId,
    /// 1-based enrollment number as currently assigned.
    pub enrollment_number: usize,
    pub comment: String,
}

impl DisenrollCommand {
    pub fn new(student_id: StudentId, enrollment_number: usize, comment: impl Into<String>) -> Self {
        Self {
            student_id,
            enrollment_number,
            comment: comment.into(),
        }
    }
}

impl Message for DisenrollCommand {
    type Output = CommandResult;
    const NAME: &'static str = "Disenroll";
}

impl Command for DisenrollCommand {}
