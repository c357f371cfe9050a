use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Smallest source set a quiz can be started from.
pub const MIN_QUESTIONS: usize = 2;
/// Smallest sample in count mode.
pub const MIN_SAMPLE_COUNT: u32 = 2;
pub const MIN_SAMPLE_PERCENT: u32 = 10;
pub const MAX_SAMPLE_PERCENT: u32 = 100;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Quiz must contain at least 2 questions")]
    TooFewQuestions { found: usize },

    #[error("Please enter a quiz size value")]
    MissingSampleSize,

    #[error("Quiz size must be a valid number")]
    InvalidSampleSize { raw: String },

    #[error("Quiz Size must be between 10% and 100%")]
    PercentageOutOfRange { value: u32 },

    #[error("Quiz must have at least 2 questions")]
    CountTooSmall { value: u32 },

    #[error("Question count cannot exceed {available}")]
    CountExceedsSource { requested: u32, available: usize },

    #[error("unknown sample mode: {raw}")]
    UnknownSampleMode { raw: String },
}

/// Checks that a source set is large enough to build any session from.
///
/// # Errors
///
/// Returns `ConfigError::TooFewQuestions` below `MIN_QUESTIONS`.
pub fn ensure_playable(question_count: usize) -> Result<(), ConfigError> {
    if question_count < MIN_QUESTIONS {
        return Err(ConfigError::TooFewQuestions {
            found: question_count,
        });
    }
    Ok(())
}

//
// ─── SAMPLE MODE ───────────────────────────────────────────────────────────────
//

/// How `sample_size` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    /// Percentage of the source set, 10 to 100.
    #[default]
    Percentage,
    /// Absolute number of questions.
    Count,
}

impl FromStr for SampleMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(Self::Percentage),
            "count" | "#" => Ok(Self::Count),
            _ => Err(ConfigError::UnknownSampleMode {
                raw: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleMode::Percentage => f.write_str("percentage"),
            SampleMode::Count => f.write_str("count"),
        }
    }
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Settings for one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    shuffle_questions: bool,
    shuffle_options: bool,
    sample_mode: SampleMode,
    sample_size: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            shuffle_questions: false,
            shuffle_options: false,
            sample_mode: SampleMode::Percentage,
            sample_size: MAX_SAMPLE_PERCENT,
        }
    }
}

impl QuizConfig {
    /// Creates a config without checking it against a source set.
    ///
    /// Use `validate_for` before building a session from it.
    #[must_use]
    pub fn new(
        shuffle_questions: bool,
        shuffle_options: bool,
        sample_mode: SampleMode,
        sample_size: u32,
    ) -> Self {
        Self {
            shuffle_questions,
            shuffle_options,
            sample_mode,
            sample_size,
        }
    }

    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    #[must_use]
    pub fn sample_mode(&self) -> SampleMode {
        self.sample_mode
    }

    #[must_use]
    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    /// True when either question or option order is randomised.
    #[must_use]
    pub fn shuffles_anything(&self) -> bool {
        self.shuffle_questions || self.shuffle_options
    }

    /// Percentage shown next to results when only part of the set was used.
    #[must_use]
    pub fn partial_percentage(&self) -> Option<u32> {
        match self.sample_mode {
            SampleMode::Percentage if self.sample_size < MAX_SAMPLE_PERCENT => {
                Some(self.sample_size)
            }
            _ => None,
        }
    }

    /// Session-creation preconditions against a source set of `question_count`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooFewQuestions` if the source is too small, or a
    /// range error if `sample_size` is invalid for the selected mode.
    pub fn validate_for(&self, question_count: usize) -> Result<(), ConfigError> {
        ensure_playable(question_count)?;
        match self.sample_mode {
            SampleMode::Percentage => {
                if !(MIN_SAMPLE_PERCENT..=MAX_SAMPLE_PERCENT).contains(&self.sample_size) {
                    return Err(ConfigError::PercentageOutOfRange {
                        value: self.sample_size,
                    });
                }
            }
            SampleMode::Count => {
                if self.sample_size < MIN_SAMPLE_COUNT {
                    return Err(ConfigError::CountTooSmall {
                        value: self.sample_size,
                    });
                }
                let requested = usize::try_from(self.sample_size).unwrap_or(usize::MAX);
                if requested > question_count {
                    return Err(ConfigError::CountExceedsSource {
                        requested: self.sample_size,
                        available: question_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of questions a session keeps from a source of `question_count`.
    ///
    /// Percentage mode rounds up and keeps at least one question; 100% keeps
    /// everything. Count mode never exceeds the source.
    #[must_use]
    pub fn target_count(&self, question_count: usize) -> usize {
        let size = usize::try_from(self.sample_size).unwrap_or(usize::MAX);
        match self.sample_mode {
            SampleMode::Percentage if size >= 100 => question_count,
            SampleMode::Percentage => {
                let scaled = size.saturating_mul(question_count);
                scaled.div_ceil(100).max(1).min(question_count)
            }
            SampleMode::Count => size.min(question_count),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Raw configuration as entered by a user, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfigDraft {
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub sample_mode: SampleMode,
    pub sample_size: String,
}

impl Default for QuizConfigDraft {
    fn default() -> Self {
        Self {
            shuffle_questions: false,
            shuffle_options: false,
            sample_mode: SampleMode::Percentage,
            sample_size: MAX_SAMPLE_PERCENT.to_string(),
        }
    }
}

impl QuizConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw size and check the result against a source set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty or non-numeric size, or when the
    /// parsed config fails `QuizConfig::validate_for`.
    pub fn validate(self, question_count: usize) -> Result<QuizConfig, ConfigError> {
        let raw = self.sample_size.trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingSampleSize);
        }
        let sample_size: u32 = raw.parse().map_err(|_| ConfigError::InvalidSampleSize {
            raw: raw.to_string(),
        })?;

        let config = QuizConfig::new(
            self.shuffle_questions,
            self.shuffle_options,
            self.sample_mode,
            sample_size,
        );
        config.validate_for(question_count)?;
        Ok(config)
    }
}
