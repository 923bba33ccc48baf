//! Error types for the Fouxd Training core

use crate::catalog::ExerciseCategory;
use crate::validation::ValidationError;
use thiserror::Error;

/// Plan generation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// The exercise catalog has no entries for a category. This is a
    /// deployment defect, never a user error.
    #[error("Exercise catalog has no exercises for category {0}")]
    EmptyCategory(ExerciseCategory),

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ValidationError),
}

/// Workout session errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Workout session has not been started")]
    NotStarted,

    #[error("Workout session has already been started")]
    AlreadyStarted,

    #[error("Workout session is already finished")]
    AlreadyFinished,
}
