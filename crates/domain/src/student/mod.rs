//! Student aggregate and related types.

mod aggregate;
mod commands;
mod course;
mod enrollment;
mod grade;
mod handlers;
mod queries;

pub use aggregate::Student;
pub use commands::*;
pub use course::Course;
pub use enrollment::{Disenrollment, Enrollment, EnrollmentNumber};
pub use grade::{Grade, GradeParseError};
pub use handlers::{
    DisenrollHandler, EditPersonalInfoHandler, EnrollHandler, GetListHandler, RegisterHandler,
    TransferHandler, UnregisterHandler,
};
pub use queries::{EnrollmentSummary, GetListQuery, StudentSummary};

use thiserror::Error;

/// Errors that can occur during student operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentError {
    /// Name is blank.
    #[error("Name is required")]
    NameRequired,

    /// Email is blank.
    #[error("Email is required")]
    EmailRequired,

    /// No enrollment currently holds the number.
    #[error("No enrollment found with number '{number}'")]
    EnrollmentNotFound { number: EnrollmentNumber },

    /// Removing an enrollment needs a reason.
    #[error("Disenrollment comment is required")]
    DisenrollmentCommentRequired,
}
