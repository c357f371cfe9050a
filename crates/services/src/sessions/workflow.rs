use quiz_core::model::{QuestionSet, QuizConfig, QuizConfigDraft};
use tracing::{info, warn};

use super::attempt::{AnswerFeedback, AttemptOutcome, QuizAttempt, Step};
use crate::error::{LoadError, SessionError};
use crate::loader::load_quiz_str;
use crate::session_builder::SessionBuilder;
use crate::{Clock, Shuffler};

/// An accepted upload: the source set and the name it was uploaded under.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceQuiz {
    pub name: String,
    pub questions: QuestionSet,
}

/// Which screen the owned state corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Configure,
    Quiz,
    Results,
}

/// How a finished attempt is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryMode {
    /// Same derived questions in the same order, answers cleared.
    SameLayout,
    /// Rebuild from the source set with fresh randomness.
    Reshuffle,
}

/// Owns everything one user flow needs: the uploaded source set, the active
/// configuration and the current attempt.
///
/// Each transition replaces state wholesale. Uploading discards the previous
/// source and attempt; retrying discards the previous attempt.
#[derive(Debug, Default)]
pub struct QuizWorkflow {
    clock: Clock,
    shuffler: Shuffler,
    source: Option<SourceQuiz>,
    config: Option<QuizConfig>,
    attempt: Option<QuizAttempt>,
}

impl QuizWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_shuffler(mut self, shuffler: Shuffler) -> Self {
        self.shuffler = shuffler;
        self
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        match (&self.source, &self.attempt) {
            (None, _) => Stage::Upload,
            (Some(_), None) => Stage::Configure,
            (Some(_), Some(attempt)) if attempt.is_finished() => Stage::Results,
            (Some(_), Some(_)) => Stage::Quiz,
        }
    }

    #[must_use]
    pub fn source(&self) -> Option<&SourceQuiz> {
        self.source.as_ref()
    }

    /// Configuration the current attempt was started with.
    #[must_use]
    pub fn active_config(&self) -> Option<&QuizConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn attempt(&self) -> Option<&QuizAttempt> {
        self.attempt.as_ref()
    }

    /// Accept a new upload, replacing any previous source and attempt.
    ///
    /// A rejected upload also clears the previous source.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the text is not a playable question document.
    pub fn upload(
        &mut self,
        name: impl Into<String>,
        text: &str,
    ) -> Result<&SourceQuiz, LoadError> {
        let name = name.into();
        self.abandon();
        let questions = load_quiz_str(text).inspect_err(|err| {
            warn!(file = %name, error = %err, "rejected quiz upload");
        })?;
        info!(file = %name, questions = questions.len(), "quiz uploaded");
        Ok(self.source.insert(SourceQuiz { name, questions }))
    }

    /// Validate raw settings against the uploaded set and start an attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSource` before an upload and
    /// `SessionError::Config` when the settings are invalid; the source set
    /// stays loaded either way.
    pub fn start(&mut self, draft: QuizConfigDraft) -> Result<&QuizAttempt, SessionError> {
        let count = self
            .source
            .as_ref()
            .map(|source| source.questions.len())
            .ok_or(SessionError::NoSource)?;
        let config = draft.validate(count)?;
        self.start_with(config)
    }

    /// Start an attempt from an already parsed config.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSource` before an upload, or the builder's
    /// configuration error.
    pub fn start_with(&mut self, config: QuizConfig) -> Result<&QuizAttempt, SessionError> {
        let attempt = self.build_attempt(&config)?;
        info!(
            questions = attempt.total_questions(),
            mode = %config.sample_mode(),
            size = config.sample_size(),
            "quiz attempt started"
        );
        self.config = Some(config);
        Ok(self.attempt.insert(attempt))
    }

    fn build_attempt(&mut self, config: &QuizConfig) -> Result<QuizAttempt, SessionError> {
        let source = self.source.as_ref().ok_or(SessionError::NoSource)?;
        let derived = SessionBuilder::new(&source.questions, config).build(&mut self.shuffler)?;
        QuizAttempt::new(derived, *config, self.clock.now())
    }

    fn attempt_mut(&mut self) -> Result<&mut QuizAttempt, SessionError> {
        self.attempt.as_mut().ok_or(SessionError::NoAttempt)
    }

    /// Answer the current question of the running attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAttempt` without an attempt, otherwise see
    /// `QuizAttempt::answer_current`.
    pub fn answer(&mut self, option: usize) -> Result<AnswerFeedback, SessionError> {
        self.attempt_mut()?.answer_current(option)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoAttempt` without an attempt, otherwise see
    /// `QuizAttempt::advance`.
    pub fn advance(&mut self) -> Result<Step, SessionError> {
        let now = self.clock.now();
        let step = self.attempt_mut()?.advance(now)?;
        if step == Step::Results {
            info!("quiz attempt finished");
        }
        Ok(step)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoAttempt` without an attempt.
    pub fn go_back(&mut self) -> Result<bool, SessionError> {
        Ok(self.attempt_mut()?.go_back())
    }

    /// Score and timing of the current attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAttempt` without an attempt and
    /// `SessionError::Incomplete` while questions remain unanswered.
    pub fn results(&self) -> Result<AttemptOutcome, SessionError> {
        let attempt = self.attempt.as_ref().ok_or(SessionError::NoAttempt)?;
        if !attempt.is_complete() {
            return Err(SessionError::Incomplete {
                answered: attempt.answered_count(),
                total: attempt.total_questions(),
            });
        }
        Ok(attempt.outcome(self.clock.now()))
    }

    /// Percentage to show beside the results heading, if only part of the
    /// source set was used.
    #[must_use]
    pub fn results_heading_percentage(&self) -> Option<u32> {
        self.config.as_ref().and_then(QuizConfig::partial_percentage)
    }

    /// Whether a retry should offer a fresh shuffle as well as the same layout.
    #[must_use]
    pub fn retry_offers_reshuffle(&self) -> bool {
        self.config.as_ref().is_some_and(QuizConfig::shuffles_anything)
    }

    /// Replace the current attempt with a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoAttempt` without a previous attempt.
    pub fn retry(&mut self, mode: RetryMode) -> Result<&QuizAttempt, SessionError> {
        let previous = self.attempt.as_ref().ok_or(SessionError::NoAttempt)?;
        let config = *previous.config();
        let attempt = match mode {
            RetryMode::SameLayout => previous.restarted(self.clock.now()),
            RetryMode::Reshuffle => self.build_attempt(&config)?,
        };
        info!(?mode, questions = attempt.total_questions(), "quiz attempt retried");
        Ok(self.attempt.insert(attempt))
    }

    /// Drop the source set, configuration and attempt.
    pub fn abandon(&mut self) {
        if self.source.is_some() {
            info!("quiz abandoned");
        }
        self.attempt = None;
        self.config = None;
        self.source = None;
    }
}
