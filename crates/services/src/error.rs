//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::ConfigError;

/// Errors emitted while turning an uploaded payload into a source set.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("Invalid JSON file format")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Rejected(#[from] quiz_core::Error),
}

/// Errors emitted by session building and attempts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("no quiz has been uploaded")]
    NoSource,
    #[error("no quiz attempt in progress")]
    NoAttempt,
    #[error("question {position} has already been answered")]
    AlreadyAnswered { position: usize },
    #[error("option {option} does not exist for question {position} ({options} options)")]
    OptionOutOfRange {
        position: usize,
        option: usize,
        options: usize,
    },
    #[error("answer question {position} before moving on")]
    Unanswered { position: usize },
    #[error("{answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
