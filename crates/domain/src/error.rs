//! Domain error types.

use student_store::StoreError;
use thiserror::Error;

use crate::student::{GradeParseError, StudentError};

/// Why a command failed. Every variant carries the message shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Input was rejected: blank field, unparsable grade, missing comment.
    #[error("{0}")]
    Validation(String),

    /// A student, course or enrollment number did not resolve.
    #[error("{0}")]
    NotFound(String),

    /// The unit of work could not read or commit.
    #[error("{0}")]
    Storage(String),
}

impl CommandError {
    /// Returns the human-readable failure message.
    pub fn message(&self) -> &str {
        match self {
            CommandError::Validation(msg)
            | CommandError::NotFound(msg)
            | CommandError::Storage(msg) => msg,
        }
    }

    /// Returns the failure kind as a label.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::Validation(_) => "validation",
            CommandError::NotFound(_) => "not_found",
            CommandError::Storage(_) => "storage",
        }
    }

    pub(crate) fn student_not_found(id: impl std::fmt::Display) -> Self {
        CommandError::NotFound(format!("No student found for Id {id}"))
    }

    pub(crate) fn course_not_found(name: &str) -> Self {
        CommandError::NotFound(format!("Course is incorrect: '{name}'"))
    }
}

impl From<StudentError> for CommandError {
    fn from(e: StudentError) -> Self {
        match e {
            StudentError::EnrollmentNotFound { .. } => CommandError::NotFound(e.to_string()),
            StudentError::NameRequired
            | StudentError::EmailRequired
            | StudentError::DisenrollmentCommentRequired => CommandError::Validation(e.to_string()),
        }
    }
}

impl From<GradeParseError> for CommandError {
    fn from(e: GradeParseError) -> Self {
        CommandError::Validation(e.to_string())
    }
}

impl From<StoreError> for CommandError {
    fn from(e: StoreError) -> Self {
        CommandError::Storage(format!("Storage failure: {e}"))
    }
}

/// Wiring faults detected when the dispatcher is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A message type was registered more than once.
    #[error("More than one handler registered for {message}")]
    DuplicateHandler { message: &'static str },

    /// Message types left without a handler.
    #[error("No handler registered for: {}", messages.join(", "))]
    MissingHandlers { messages: Vec<&'static str> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::EnrollmentNumber;

    #[test]
    fn student_errors_map_to_kinds() {
        let err: CommandError = StudentError::DisenrollmentCommentRequired.into();
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.message(), "Disenrollment comment is required");

        let err: CommandError = StudentError::EnrollmentNotFound {
            number: EnrollmentNumber::new(3),
        }
        .into();
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.message(), "No enrollment found with number '3'");
    }

    #[test]
    fn not_found_messages() {
        assert_eq!(
            CommandError::student_not_found(7).message(),
            "No student found for Id 7"
        );
        assert_eq!(
            CommandError::course_not_found("Alchemy").to_string(),
            "Course is incorrect: 'Alchemy'"
        );
    }

    #[test]
    fn store_errors_are_storage_failures() {
        let err: CommandError = StoreError::CommitRejected("offline".to_string()).into();
        assert_eq!(err.kind(), "storage");
        assert!(err.message().contains("offline"));
    }

    #[test]
    fn missing_handlers_lists_every_message() {
        let err = DispatchError::MissingHandlers {
            messages: vec!["Register", "Unregister"],
        };
        assert_eq!(err.to_string(), "No handler registered for: Register, Unregister");
    }
}
