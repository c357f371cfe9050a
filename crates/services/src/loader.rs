use quiz_core::model::{QuestionSet, ensure_playable};
use serde_json::Value;
use tracing::debug;

use crate::error::LoadError;

/// Turns an uploaded text payload into a validated source set.
///
/// Runs the JSON parse, the document validator and the minimum-size
/// precondition in that order. Any failure rejects the whole payload.
///
/// # Errors
///
/// Returns `LoadError::Parse` for malformed JSON and `LoadError::Rejected`
/// for validation or size failures.
pub fn load_quiz_str(text: &str) -> Result<QuestionSet, LoadError> {
    let doc: Value = serde_json::from_str(text)?;
    let source = quiz_core::parse_question_set(&doc).map_err(quiz_core::Error::from)?;
    ensure_playable(source.len()).map_err(quiz_core::Error::from)?;
    debug!(questions = source.len(), "accepted question document");
    Ok(source)
}
