use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::question::Question;

/// Ordered questions plus whatever other top-level keys the document carried.
///
/// The same type holds both the uploaded source set and each derived set; a
/// derived set is always built as a new value, never by editing the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSet {
    questions: Vec<Question>,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

impl QuestionSet {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            metadata: Map::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns a set with the same metadata and a different question list.
    #[must_use]
    pub fn derive(&self, questions: Vec<Question>) -> Self {
        Self {
            questions,
            metadata: self.metadata.clone(),
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Question> {
        self.questions.get(position)
    }

    #[must_use]
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Serializes the set back into the upload document shape.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
