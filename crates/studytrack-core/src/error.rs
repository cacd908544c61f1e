//! Core error types.
//!
//! Scoring and aggregation are pure computations, so the only failure they
//! can report is input that does not have the expected shape. Degenerate but
//! valid input (an empty test, an empty history) never produces an error.

use thiserror::Error;

/// Errors returned by the scoring and aggregation entry points.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// The supplied records do not have the expected shape.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// The concrete shape violation behind a [`CoreError::InvalidInput`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInput {
    /// Two questions in the same test share an identifier.
    #[error("duplicate question id: {0}")]
    DuplicateQuestion(String),

    /// A question offers fewer than two options.
    #[error("question {question_id} has {count} option(s), at least 2 are required")]
    TooFewOptions { question_id: String, count: usize },

    /// The correct option does not index into the question's options.
    #[error("question {question_id} marks option {correct_option} as correct but has only {count} options")]
    CorrectOptionOutOfRange {
        question_id: String,
        correct_option: usize,
        count: usize,
    },

    /// An answer refers to a question that is not part of the test.
    #[error("answer refers to unknown question id: {0}")]
    UnknownQuestion(String),

    /// A test record carries a score that is NaN, infinite, or outside 0..=100.
    #[error("test {test_id} has invalid score {score}")]
    InvalidScore { test_id: String, score: f64 },
}

impl CoreError {
    /// Returns the underlying shape violation.
    pub fn invalid_input(&self) -> &InvalidInput {
        match self {
            CoreError::InvalidInput(inner) => inner,
        }
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, CoreError>;
