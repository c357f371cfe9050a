use quiz_core::model::{AnswerMap, QuestionSet};
use serde::Serialize;

/// One row of the post-attempt review: the question as it was presented,
/// what was picked, and what was right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub position: usize,
    pub original_index: Option<usize>,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub selected: Option<usize>,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl ReviewItem {
    /// The picked option, when it was wrong.
    #[must_use]
    pub fn wrong_selection(&self) -> Option<usize> {
        self.selected.filter(|_| !self.is_correct)
    }
}

pub(crate) fn build_review(derived: &QuestionSet, answers: &AnswerMap) -> Vec<ReviewItem> {
    derived
        .questions()
        .iter()
        .enumerate()
        .map(|(position, q)| {
            let selected = answers.get(position);
            ReviewItem {
                position,
                original_index: q.original_index(),
                question: q.text().to_string(),
                options: q.options().to_vec(),
                correct_answer: q.correct_answer(),
                selected,
                is_correct: selected.is_some_and(|opt| q.is_correct(opt)),
                explanation: q.explanation().map(str::to_string),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Question;

    #[test]
    fn review_marks_right_wrong_and_skipped() {
        let set = QuestionSet::new(vec![
            Question::new("One", vec!["a".into(), "b".into()], 0)
                .unwrap()
                .with_explanation("first letter"),
            Question::new("Two", vec!["c".into(), "d".into()], 1).unwrap(),
            Question::new("Three", vec!["e".into(), "f".into()], 0).unwrap(),
        ]);
        let answers: AnswerMap = [(0, 0), (1, 0)].into_iter().collect();

        let review = build_review(&set, &answers);

        assert_eq!(review.len(), 3);
        assert!(review[0].is_correct);
        assert_eq!(review[0].explanation.as_deref(), Some("first letter"));
        assert!(!review[1].is_correct);
        assert_eq!(review[1].wrong_selection(), Some(0));
        assert_eq!(review[2].selected, None);
        assert!(!review[2].is_correct);
        assert_eq!(review[2].wrong_selection(), None);
    }
}
