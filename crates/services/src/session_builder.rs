use quiz_core::Shuffler;
use quiz_core::model::{QuestionSet, QuizConfig};
use tracing::debug;

use crate::error::SessionError;

/// Derives the question set for one attempt from an uploaded source set.
///
/// Steps run in a fixed order: tag original positions, optionally shuffle the
/// questions, keep a prefix according to the sample settings, then shuffle
/// options per question where allowed. The source set is only read.
pub struct SessionBuilder<'a> {
    source: &'a QuestionSet,
    config: &'a QuizConfig,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(source: &'a QuestionSet, config: &'a QuizConfig) -> Self {
        Self { source, config }
    }

    /// Build a derived set, drawing all randomness from `shuffler`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` when the source is too small or the
    /// sample size is out of range for the selected mode.
    pub fn build(self, shuffler: &mut Shuffler) -> Result<QuestionSet, SessionError> {
        let total = self.source.len();
        self.config.validate_for(total)?;

        let mut questions: Vec<_> = self
            .source
            .questions()
            .iter()
            .enumerate()
            .map(|(idx, q)| q.clone().with_original_index(idx))
            .collect();

        if self.config.shuffle_questions() {
            questions = shuffler.shuffle(&questions);
        }

        let keep = self.config.target_count(total);
        questions.truncate(keep);

        let shuffle_options = self.config.shuffle_options();
        let mut shuffled_options = 0_usize;
        let questions: Vec<_> = questions
            .into_iter()
            .map(|q| {
                if shuffle_options && q.allows_option_shuffle() {
                    shuffled_options += 1;
                    q.with_shuffled_options(shuffler)
                } else {
                    q
                }
            })
            .collect();

        debug!(
            source = total,
            kept = questions.len(),
            shuffle_questions = self.config.shuffle_questions(),
            shuffled_options,
            "built derived question set"
        );

        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(self.source.derive(questions))
    }
}

/// Convenience wrapper over `SessionBuilder`.
///
/// # Errors
///
/// See `SessionBuilder::build`.
pub fn build_session(
    source: &QuestionSet,
    config: &QuizConfig,
    shuffler: &mut Shuffler,
) -> Result<QuestionSet, SessionError> {
    SessionBuilder::new(source, config).build(shuffler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ConfigError, Question, SampleMode};
    use serde_json::json;

    fn build_source(count: usize) -> QuestionSet {
        let questions = (0..count)
            .map(|i| {
                Question::new(
                    format!("Q{i}"),
                    vec![format!("right{i}"), format!("wrong{i}a"), format!("wrong{i}b")],
                    0,
                )
                .unwrap()
            })
            .collect();
        QuestionSet::new(questions)
    }

    fn config(shuffle_q: bool, shuffle_o: bool, mode: SampleMode, size: u32) -> QuizConfig {
        QuizConfig::new(shuffle_q, shuffle_o, mode, size)
    }

    #[test]
    fn identity_config_keeps_everything_in_order() {
        let source = build_source(5);
        let derived = build_session(
            &source,
            &config(false, false, SampleMode::Percentage, 100),
            &mut Shuffler::seeded(1),
        )
        .unwrap();

        assert_eq!(derived.len(), 5);
        for (idx, (got, orig)) in derived.questions().iter().zip(source.questions()).enumerate() {
            assert_eq!(got.text(), orig.text());
            assert_eq!(got.options(), orig.options());
            assert_eq!(got.correct_answer(), orig.correct_answer());
            assert_eq!(got.original_index(), Some(idx));
        }
        assert_eq!(source.questions()[0].original_index(), None);
    }

    #[test]
    fn percentage_sampling_takes_rounded_up_prefix() {
        let source = build_source(10);
        let mut shuffler = Shuffler::seeded(2);

        let cfg_half = config(false, false, SampleMode::Percentage, 50);
        let half = build_session(&source, &cfg_half, &mut shuffler).unwrap();
        assert_eq!(half.len(), 5);
        let texts: Vec<_> = half.questions().iter().map(|q| q.text().to_string()).collect();
        assert_eq!(texts, vec!["Q0", "Q1", "Q2", "Q3", "Q4"]);

        let cfg_tenth = config(false, false, SampleMode::Percentage, 10);
        let tenth = build_session(&source, &cfg_tenth, &mut shuffler).unwrap();
        assert_eq!(tenth.len(), 1);
    }

    #[test]
    fn full_percentage_with_shuffle_keeps_every_question() {
        let source = build_source(9);
        let derived = build_session(
            &source,
            &config(true, false, SampleMode::Percentage, 100),
            &mut Shuffler::seeded(3),
        )
        .unwrap();

        let mut seen: Vec<_> = derived
            .questions()
            .iter()
            .filter_map(|q| q.original_index())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn count_sampling_after_shuffle_is_a_prefix_of_the_shuffle() {
        let source = build_source(8);
        let cfg_all = config(true, false, SampleMode::Count, 8);
        let cfg_three = config(true, false, SampleMode::Count, 3);

        let all = build_session(&source, &cfg_all, &mut Shuffler::seeded(11)).unwrap();
        let three = build_session(&source, &cfg_three, &mut Shuffler::seeded(11)).unwrap();

        assert_eq!(three.len(), 3);
        assert_eq!(three.questions(), &all.questions()[..3]);
    }

    #[test]
    fn option_shuffle_tracks_correct_text() {
        let source = build_source(6);
        let derived = build_session(
            &source,
            &config(false, true, SampleMode::Percentage, 100),
            &mut Shuffler::seeded(4),
        )
        .unwrap();

        for q in derived.questions() {
            let idx = q.original_index().unwrap();
            assert_eq!(q.correct_option(), format!("right{idx}"));
        }
    }

    #[test]
    fn zero_flag_pins_options() {
        let options = vec!["a".into(), "b".into(), "c".into(), "d".into()];
        let pinned = Question::new("Pinned", options, 2)
            .unwrap()
            .with_shuffle_flag(json!(0));
        let source = QuestionSet::new(vec![pinned.clone(), pinned.clone(), pinned]);
        let cfg = config(false, true, SampleMode::Percentage, 100);
        let mut shuffler = Shuffler::seeded(5);

        for _ in 0..10 {
            let derived = build_session(&source, &cfg, &mut shuffler).unwrap();
            for q in derived.questions() {
                assert_eq!(q.options(), &["a", "b", "c", "d"]);
                assert_eq!(q.correct_answer(), 2);
            }
        }
    }

    #[test]
    fn rejects_out_of_range_config_without_touching_source() {
        let source = build_source(4);
        let before = source.clone();

        let cfg = config(false, false, SampleMode::Count, 5);
        let err = build_session(&source, &cfg, &mut Shuffler::seeded(6)).unwrap_err();
        assert_eq!(
            err,
            SessionError::Config(ConfigError::CountExceedsSource {
                requested: 5,
                available: 4
            })
        );

        let err = build_session(&build_source(1), &QuizConfig::default(), &mut Shuffler::seeded(6))
            .unwrap_err();
        assert_eq!(err, SessionError::Config(ConfigError::TooFewQuestions { found: 1 }));
        assert_eq!(source, before);
    }
}
