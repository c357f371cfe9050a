use quiz_core::model::{AnswerMap, QuestionSet, ResultSummary};

/// Scores `answers` against a derived set.
///
/// A position counts as correct only when its recorded option equals the
/// question's `correct_answer`; unanswered positions count as incorrect.
/// Inputs are only read, so results can be recomputed at any time.
#[must_use]
pub fn score(derived: &QuestionSet, answers: &AnswerMap) -> ResultSummary {
    let correct = derived
        .questions()
        .iter()
        .enumerate()
        .filter(|(position, q)| answers.get(*position).is_some_and(|opt| q.is_correct(opt)))
        .count();
    ResultSummary::from_counts(correct, derived.len())
}
