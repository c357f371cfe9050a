use std::fmt;

use serde::Serialize;

/// Scored outcome of one attempt.
///
/// `score` is on a 0-10 scale, rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    correct_count: usize,
    incorrect_count: usize,
    score: f64,
}

impl ResultSummary {
    /// Builds a summary from `correct` out of `total` questions.
    ///
    /// An empty attempt scores zero.
    #[must_use]
    pub fn from_counts(correct: usize, total: usize) -> Self {
        debug_assert!(correct <= total);
        let score = if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let ratio = correct as f64 / total as f64;
            round_two_places(ratio * 10.0)
        };
        Self {
            correct_count: correct,
            incorrect_count: total.saturating_sub(correct),
            score,
        }
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.incorrect_count
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.correct_count + self.incorrect_count
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.score)
    }
}

fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_add_up_and_score_rounds() {
        let summary = ResultSummary::from_counts(2, 3);
        assert_eq!(summary.correct_count(), 2);
        assert_eq!(summary.incorrect_count(), 1);
        assert_eq!(summary.total(), 3);
        assert!((summary.score() - 6.67).abs() < f64::EPSILON);
        assert_eq!(summary.to_string(), "6.67");
    }

    #[test]
    fn full_and_empty_marks() {
        assert_eq!(ResultSummary::from_counts(4, 4).to_string(), "10.00");
        assert_eq!(ResultSummary::from_counts(0, 4).to_string(), "0.00");
        assert_eq!(ResultSummary::from_counts(0, 0).score(), 0.0);
    }
}
