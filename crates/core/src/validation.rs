//! Shape checks for an uploaded question document.
//!
//! Input is an already-parsed JSON value from an untrusted source. Checks stop
//! at the first problem found; a document is either accepted whole or rejected.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{QUESTION_FIELDS, Question, QuestionSet};

const QUESTIONS_KEY: &str = "questions";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Invalid format: missing \"questions\" array")]
    MissingQuestions,

    #[error("Invalid question format at index {index}")]
    InvalidQuestionFormat { index: usize },

    #[error("Question {index} must have at least 2 options")]
    TooFewOptions { index: usize, found: usize },

    #[error("Invalid correctAnswer index for question {index}")]
    InvalidCorrectAnswer { index: usize },

    #[error("Question {index} option {option} must be a string")]
    InvalidOption { index: usize, option: usize },
}

impl ValidationError {
    /// Index of the offending question, if the error is about one question.
    #[must_use]
    pub fn question_index(&self) -> Option<usize> {
        match self {
            ValidationError::MissingQuestions => None,
            ValidationError::InvalidQuestionFormat { index }
            | ValidationError::TooFewOptions { index, .. }
            | ValidationError::InvalidCorrectAnswer { index }
            | ValidationError::InvalidOption { index, .. } => Some(*index),
        }
    }
}

/// Checks `doc` against the question document shape.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn validate(doc: &Value) -> Result<(), ValidationError> {
    parse_question_set(doc).map(|_| ())
}

/// Validates `doc` and converts it into a source `QuestionSet`.
///
/// Top-level keys other than `questions` become set metadata; question keys
/// this model does not interpret are kept on each question.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn parse_question_set(doc: &Value) -> Result<QuestionSet, ValidationError> {
    let Some(root) = doc.as_object() else {
        return Err(ValidationError::MissingQuestions);
    };
    let Some(raw_questions) = root.get(QUESTIONS_KEY).and_then(Value::as_array) else {
        return Err(ValidationError::MissingQuestions);
    };

    let questions = raw_questions
        .iter()
        .enumerate()
        .map(|(index, raw)| parse_question(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let metadata: Map<String, Value> = root
        .iter()
        .filter(|(key, _)| key.as_str() != QUESTIONS_KEY)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(QuestionSet::new(questions).with_metadata(metadata))
}

fn parse_question(index: usize, raw: &Value) -> Result<Question, ValidationError> {
    let format_error = ValidationError::InvalidQuestionFormat { index };
    let fields = raw.as_object().ok_or_else(|| format_error.clone())?;

    let text = fields
        .get("question")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| format_error.clone())?;
    let raw_options = fields
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(|| format_error.clone())?;
    let raw_correct = fields
        .get("correctAnswer")
        .ok_or_else(|| format_error.clone())?;

    if raw_options.len() < 2 {
        return Err(ValidationError::TooFewOptions {
            index,
            found: raw_options.len(),
        });
    }

    let correct_answer = integral_index(raw_correct)
        .filter(|idx| *idx < raw_options.len())
        .ok_or(ValidationError::InvalidCorrectAnswer { index })?;

    let options = raw_options
        .iter()
        .enumerate()
        .map(|(option, value)| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or(ValidationError::InvalidOption { index, option })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let explanation = match fields.get("explanation") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => return Err(format_error),
    };

    let extra: Map<String, Value> = fields
        .iter()
        .filter(|(key, _)| !QUESTION_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut question = Question::new(text, options, correct_answer)
        .map_err(|_| format_error)?
        .with_extra(extra);
    if let Some(explanation) = explanation {
        question = question.with_explanation(explanation);
    }
    if let Some(flag) = fields.get("shuffle") {
        question = question.with_shuffle_flag(flag.clone());
    }
    Ok(question)
}

/// Reads a non-negative whole number, accepting `1` and `1.0` alike.
fn integral_index(value: &Value) -> Option<usize> {
    if let Some(idx) = value.as_u64() {
        return usize::try_from(idx).ok();
    }
    let float = value.as_f64()?;
    if float.fract() != 0.0 || float < 0.0 || float > u32::MAX as f64 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = float as usize;
    Some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_doc() -> Value {
        json!({
            "title": "Capitals",
            "questions": [
                {
                    "question": "Capital of France?",
                    "options": ["Paris", "Lyon", "Nice"],
                    "correctAnswer": 0,
                    "explanation": "Paris has been the capital since 987."
                },
                {
                    "question": "Capital of Italy?",
                    "options": ["Milan", "Rome"],
                    "correctAnswer": 1,
                    "shuffle": 0,
                    "difficulty": "easy"
                }
            ]
        })
    }

    #[test]
    fn accepts_valid_document() {
        assert_eq!(validate(&valid_doc()), Ok(()));

        let set = parse_question_set(&valid_doc()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.metadata()["title"], json!("Capitals"));
        assert_eq!(
            set.questions()[0].explanation(),
            Some("Paris has been the capital since 987.")
        );
        assert!(!set.questions()[1].allows_option_shuffle());
        assert_eq!(set.questions()[1].extra()["difficulty"], json!("easy"));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let doc = json!({
            "questions": [{ "question": "Q", "options": ["a", "b"], "correctAnswer": 1 }]
        });
        let set = parse_question_set(&doc).unwrap();
        assert_eq!(set.questions()[0].explanation(), None);
        assert!(set.questions()[0].allows_option_shuffle());
    }

    #[test]
    fn rejects_missing_or_non_array_questions() {
        for doc in [json!({}), json!({ "questions": {} }), json!([1, 2]), json!(null)] {
            let err = validate(&doc).unwrap_err();
            assert_eq!(err, ValidationError::MissingQuestions);
            assert_eq!(err.to_string(), "Invalid format: missing \"questions\" array");
        }
    }

    #[test]
    fn rejects_each_broken_question_rule() {
        let cases = [
            (
                json!({ "options": ["a", "b"], "correctAnswer": 0 }),
                ValidationError::InvalidQuestionFormat { index: 1 },
            ),
            (
                json!({ "question": "", "options": ["a", "b"], "correctAnswer": 0 }),
                ValidationError::InvalidQuestionFormat { index: 1 },
            ),
            (
                json!({ "question": "Q", "correctAnswer": 0 }),
                ValidationError::InvalidQuestionFormat { index: 1 },
            ),
            (
                json!({ "question": "Q", "options": "a,b", "correctAnswer": 0 }),
                ValidationError::InvalidQuestionFormat { index: 1 },
            ),
            (
                json!({ "question": "Q", "options": ["a", "b"] }),
                ValidationError::InvalidQuestionFormat { index: 1 },
            ),
            (
                json!({ "question": "Q", "options": ["a"], "correctAnswer": 0 }),
                ValidationError::TooFewOptions { index: 1, found: 1 },
            ),
            (
                json!({ "question": "Q", "options": ["a", "b"], "correctAnswer": 2 }),
                ValidationError::InvalidCorrectAnswer { index: 1 },
            ),
            (
                json!({ "question": "Q", "options": ["a", "b"], "correctAnswer": -1 }),
                ValidationError::InvalidCorrectAnswer { index: 1 },
            ),
            (
                json!({ "question": "Q", "options": ["a", "b"], "correctAnswer": "0" }),
                ValidationError::InvalidCorrectAnswer { index: 1 },
            ),
            (
                json!({ "question": "Q", "options": ["a", 2], "correctAnswer": 0 }),
                ValidationError::InvalidOption {
                    index: 1,
                    option: 1,
                },
            ),
        ];

        for (bad, expected) in cases {
            let doc = json!({
                "questions": [
                    { "question": "ok", "options": ["x", "y"], "correctAnswer": 0 },
                    bad
                ]
            });
            assert_eq!(validate(&doc).unwrap_err(), expected);
        }
    }

    #[test]
    fn reports_first_invalid_question_only() {
        let doc = json!({
            "questions": [
                { "question": "ok", "options": ["x", "y"], "correctAnswer": 0 },
                { "question": "Q", "options": ["a"], "correctAnswer": 0 },
                { "options": ["a", "b"], "correctAnswer": 0 }
            ]
        });
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.question_index(), Some(1));
        assert_eq!(err.to_string(), "Question 1 must have at least 2 options");
    }

    #[test]
    fn whole_number_floats_are_valid_indices() {
        let doc = json!({
            "questions": [{ "question": "Q", "options": ["a", "b"], "correctAnswer": 1.0 }]
        });
        let set = parse_question_set(&doc).unwrap();
        assert_eq!(set.questions()[0].correct_answer(), 1);

        let doc = json!({
            "questions": [{ "question": "Q", "options": ["a", "b"], "correctAnswer": 0.5 }]
        });
        assert_eq!(
            validate(&doc).unwrap_err(),
            ValidationError::InvalidCorrectAnswer { index: 0 }
        );
    }

    #[test]
    fn authored_original_index_is_not_kept_as_extra() {
        let doc = json!({
            "questions": [
                {
                    "question": "Q",
                    "options": ["a", "b"],
                    "correctAnswer": 0,
                    "originalIndex": 7
                }
            ]
        });
        let set = parse_question_set(&doc).unwrap();
        let q = &set.questions()[0];
        assert!(q.extra().get("originalIndex").is_none());
        assert_eq!(q.original_index(), None);
    }

    #[test]
    fn min_question_count_is_not_a_validator_rule() {
        let doc = json!({
            "questions": [{ "question": "Q", "options": ["a", "b"], "correctAnswer": 0 }]
        });
        assert_eq!(validate(&doc), Ok(()));
    }
}
