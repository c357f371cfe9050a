mod attempt;
mod progress;
mod review;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use attempt::{AnswerFeedback, AttemptOutcome, QuizAttempt, Step};
pub use progress::SessionProgress;
pub use review::ReviewItem;
pub use workflow::{QuizWorkflow, RetryMode, SourceQuiz, Stage};
