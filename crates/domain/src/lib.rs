//! Domain layer for student enrollment records.
//!
//! This crate provides:
//! - The Student aggregate with its enrollments, disenrollments, courses and grades
//! - Command and query messages with one handler each
//! - A dispatcher that routes any message to its handler

pub mod dispatch;
pub mod error;
pub mod message;
pub mod student;

pub use dispatch::{Messages, MessagesBuilder};
pub use error::{CommandError, DispatchError};
pub use message::{Command, CommandResult, Handler, Message, Query};
pub use student::{
    Course, DisenrollCommand, Disenrollment, EditPersonalInfoCommand, EnrollCommand, Enrollment,
    EnrollmentNumber, EnrollmentSummary, GetListQuery, Grade, GradeParseError, RegisterCommand,
    Student, StudentError, StudentSummary, TransferCommand, UnregisterCommand,
};
