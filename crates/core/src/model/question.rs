use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::shuffle::Shuffler;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must have at least 2 options, found {found}")]
    TooFewOptions { found: usize },

    #[error("correct answer {index} is out of range for {options} options")]
    CorrectAnswerOutOfRange { index: usize, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Wire names of the fields `Question` owns; never carried in `extra`.
pub const QUESTION_FIELDS: [&str; 6] = [
    "question",
    "options",
    "correctAnswer",
    "explanation",
    "shuffle",
    "originalIndex",
];

/// A single multiple-choice question.
///
/// The constructor guarantees that `correct_answer` indexes into `options`,
/// so every question held by a set, source or derived, can be scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shuffle: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_index: Option<usize>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Question {
    /// Creates a question with no explanation and default shuffle eligibility.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, fewer than two options are
    /// given, or `correct_answer` does not index into `options`.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let question = text.into();
        if question.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                found: options.len(),
            });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        Ok(Self {
            question,
            options,
            correct_answer,
            explanation: None,
            shuffle: None,
            original_index: None,
            extra: Map::new(),
        })
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Sets the raw per-question shuffle flag as authored.
    #[must_use]
    pub fn with_shuffle_flag(mut self, flag: Value) -> Self {
        self.shuffle = Some(flag);
        self
    }

    /// Attaches authored fields this model does not interpret.
    ///
    /// Keys named in `QUESTION_FIELDS` are dropped.
    #[must_use]
    pub fn with_extra(mut self, mut extra: Map<String, Value>) -> Self {
        extra.retain(|key, _| !QUESTION_FIELDS.contains(&key.as_str()));
        self.extra = extra;
        self
    }

    /// Tags the question with its position in the uploaded set.
    #[must_use]
    pub fn with_original_index(mut self, index: usize) -> Self {
        self.original_index = Some(index);
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Text of the correct option.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn shuffle_flag(&self) -> Option<&Value> {
        self.shuffle.as_ref()
    }

    /// Position of this question in the uploaded set, once tagged.
    #[must_use]
    pub fn original_index(&self) -> Option<usize> {
        self.original_index
    }

    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Whether this question's options may be reordered.
    ///
    /// Only a numeric flag equal to `0` opts out; an absent flag or any other
    /// value keeps the question eligible.
    #[must_use]
    pub fn allows_option_shuffle(&self) -> bool {
        !self
            .shuffle
            .as_ref()
            .and_then(Value::as_f64)
            .is_some_and(|flag| flag == 0.0)
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }

    /// Returns a copy with its options permuted by `shuffler`.
    ///
    /// Each option travels with its original index, and the new
    /// `correct_answer` is the position whose original index was the old one,
    /// so the correct answer follows its text rather than its slot.
    #[must_use]
    pub fn with_shuffled_options(&self, shuffler: &mut Shuffler) -> Self {
        let tagged: Vec<(usize, &String)> = self.options.iter().enumerate().collect();
        let shuffled = shuffler.shuffle(&tagged);
        let correct_answer = shuffled
            .iter()
            .position(|(original, _)| *original == self.correct_answer)
            .unwrap_or(self.correct_answer);

        Self {
            options: shuffled.into_iter().map(|(_, option)| option.clone()).collect(),
            correct_answer,
            ..self.clone()
        }
    }
}
