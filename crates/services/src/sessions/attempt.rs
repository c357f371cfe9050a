use chrono::{DateTime, Duration, Utc};
use std::fmt;

use quiz_core::model::{AnswerMap, Question, QuestionSet, QuizConfig, ResultSummary};

use super::progress::SessionProgress;
use super::review::{ReviewItem, build_review};
use crate::error::SessionError;
use crate::scoring::score;

//
// ─── ANSWER FEEDBACK ───────────────────────────────────────────────────────────
//

/// Immediate feedback after answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub position: usize,
    pub selected: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub explanation: Option<String>,
    pub all_answered: bool,
}

/// Where `advance` moved the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Question(usize),
    Results,
}

/// Results plus timing for a finished (or in-progress) attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub summary: ResultSummary,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub elapsed: Duration,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// One pass through a derived question set.
///
/// Owns the derived set and its answers exclusively. Retrying produces a new
/// attempt rather than mutating this one.
#[derive(Clone)]
pub struct QuizAttempt {
    config: QuizConfig,
    questions: QuestionSet,
    answers: AnswerMap,
    current: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    /// Start an attempt over an already derived set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the derived set has no questions.
    pub fn new(
        questions: QuestionSet,
        config: QuizConfig,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            config,
            questions,
            answers: AnswerMap::new(),
            current: 0,
            started_at,
            completed_at: None,
        })
    }

    /// Same questions in the same layout, with answers cleared.
    #[must_use]
    pub fn restarted(&self, started_at: DateTime<Utc>) -> Self {
        Self {
            config: self.config,
            questions: self.questions.clone(),
            answers: AnswerMap::new(),
            current: 0,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn current_position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Option picked for the current question, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.answers.get(self.current)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total_questions().saturating_sub(self.answered_count())
    }

    /// Every position has an answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answered_count() >= self.total_questions()
    }

    /// The attempt has moved on to its results.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.remaining(),
            current: self.current,
            is_complete: self.is_complete(),
        }
    }

    /// Record `option` for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyAnswered` if this position already has an
    /// answer and `SessionError::OptionOutOfRange` for an unknown option.
    pub fn answer_current(&mut self, option: usize) -> Result<AnswerFeedback, SessionError> {
        let position = self.current;
        let Some(question) = self.questions.get(position) else {
            return Err(SessionError::Empty);
        };
        if option >= question.options().len() {
            return Err(SessionError::OptionOutOfRange {
                position,
                option,
                options: question.options().len(),
            });
        }
        let correct_answer = question.correct_answer();
        let explanation = question.explanation().map(str::to_string);

        if !self.answers.record(position, option) {
            return Err(SessionError::AlreadyAnswered { position });
        }

        Ok(AnswerFeedback {
            position,
            selected: option,
            correct_answer,
            is_correct: option == correct_answer,
            explanation,
            all_answered: self.is_complete(),
        })
    }

    /// Move forward once the current question is answered.
    ///
    /// Positions are only ever left once answered, so passing the last one
    /// finishes the attempt with every question answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Unanswered` if the current question has no answer.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<Step, SessionError> {
        if !self.answers.is_answered(self.current) {
            return Err(SessionError::Unanswered {
                position: self.current,
            });
        }
        if self.current + 1 < self.total_questions() {
            self.current += 1;
            return Ok(Step::Question(self.current));
        }
        if self.completed_at.is_none() {
            self.completed_at = Some(at);
        }
        Ok(Step::Results)
    }

    /// Move to the previous question. Returns `false` at the first one.
    pub fn go_back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        score(&self.questions, &self.answers)
    }

    /// Time from start to completion, or to `now` while unfinished.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        self.completed_at.unwrap_or(now) - self.started_at
    }

    #[must_use]
    pub fn outcome(&self, now: DateTime<Utc>) -> AttemptOutcome {
        AttemptOutcome {
            summary: self.summary(),
            started_at: self.started_at,
            completed_at: self.completed_at,
            elapsed: self.elapsed(now),
        }
    }

    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        build_review(&self.questions, &self.answers)
    }
}

impl fmt::Debug for QuizAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizAttempt")
            .field("config", &self.config)
            .field("questions_len", &self.questions.len())
            .field("answered", &self.answers.len())
            .field("current", &self.current)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
