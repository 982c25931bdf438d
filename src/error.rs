//! Error classes surfaced by the record store and the mutation handlers.
//!
//! Callers match on the variant: `Validation` means the user can correct the
//! input and try again, everything else abandons the operation.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Io(#[from] rusqlite::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Bow tie {id} not found")]
    NotFound { id: i64 },
    #[error("No bow tie is selected.")]
    NoSelection,
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

/// A single field that failed validation before or during a save.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} {problem}")]
pub struct ValidationError {
    pub field: &'static str,
    pub problem: ValidationProblem,
}

impl ValidationError {
    pub fn new(field: &'static str, problem: ValidationProblem) -> Self {
        Self { field, problem }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationProblem {
    TooSmall { min: f64 },
    TooLarge { max: f64 },
    NotANumber { input: String },
    /// A CHECK constraint fired without a more precise classification.
    OutOfRange,
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationProblem::TooSmall { min } => write!(f, "must be at least {min}."),
            ValidationProblem::TooLarge { max } => write!(f, "must be at most {max}."),
            ValidationProblem::NotANumber { input } => {
                write!(f, "must be a number (got \"{input}\").")
            }
            ValidationProblem::OutOfRange => write!(f, "is out of range."),
        }
    }
}
