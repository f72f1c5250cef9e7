//! Persistence for student records.
//!
//! The store works on plain records rather than domain aggregates. Every
//! read and write goes through a [`UnitOfWork`] opened from a [`Database`];
//! nothing staged in a unit of work becomes visible until it is committed.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::{CourseId, StudentId};
pub use error::{Result, StoreError};
pub use memory::{InMemoryDatabase, InMemoryUnitOfWork};
pub use postgres::{PostgresDatabase, PostgresUnitOfWork};
pub use record::{CourseRecord, DisenrollmentRecord, EnrollmentRecord, StudentRecord};
pub use store::{CommitSummary, Database, UnitOfWork, validate_student_record};
