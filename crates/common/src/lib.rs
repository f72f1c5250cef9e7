//! Identifier types shared by the store, domain and API crates.

mod types;

pub use types::{CourseId, StudentId};
