#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod scoring;
pub mod session_builder;
pub mod sessions;

pub use quiz_core::{Clock, Shuffler};

pub use error::{LoadError, SessionError};
pub use loader::load_quiz_str;
pub use scoring::score;
pub use session_builder::{SessionBuilder, build_session};
pub use sessions::{
    AnswerFeedback, AttemptOutcome, QuizAttempt, QuizWorkflow, RetryMode, ReviewItem,
    SessionProgress, SourceQuiz, Stage, Step,
};
