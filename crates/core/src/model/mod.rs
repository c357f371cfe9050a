mod answers;
mod config;
mod question;
mod question_set;
mod result;

pub use answers::AnswerMap;
pub use config::{
    ConfigError, MAX_SAMPLE_PERCENT, MIN_QUESTIONS, MIN_SAMPLE_COUNT, MIN_SAMPLE_PERCENT,
    QuizConfig, QuizConfigDraft, SampleMode, ensure_playable,
};
pub use question::{QUESTION_FIELDS, Question, QuestionError};
pub use question_set::QuestionSet;
pub use result::ResultSummary;
