//! HTTP route handlers.

pub mod students;
pub mod system;
