//! Grades awarded for an enrollment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A course grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Every grade, best first.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Returns the grade letter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text that does not name a grade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Grade is incorrect: '{input}'")]
pub struct GradeParseError {
    pub input: String,
}

impl FromStr for Grade {
    type Err = GradeParseError;

    /// Parses a grade letter, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letter = s.trim();
        Grade::ALL
            .into_iter()
            .find(|grade| grade.as_str().eq_ignore_ascii_case(letter))
            .ok_or_else(|| GradeParseError {
                input: s.to_string(),
            })
    }
}
