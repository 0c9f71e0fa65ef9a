//! Exam configuration and the per-difficulty GAT presets.

use crate::error::ConfigError;
use crate::models::Difficulty;

/// The only option an [`ExamSession`](crate::ExamSession) reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamConfig {
    duration_seconds: u32,
}

impl ExamConfig {
    pub fn new(duration_seconds: u32) -> Result<Self, ConfigError> {
        if duration_seconds == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(Self { duration_seconds })
    }

    pub fn from_minutes(minutes: u32) -> Result<Self, ConfigError> {
        Self::new(minutes.saturating_mul(60))
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }
}

/// Question count and time limit for a GAT practice exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamPreset {
    pub question_count: usize,
    pub duration_minutes: u32,
}

impl ExamPreset {
    /// `None` means any difficulty, which runs the full one-hour exam.
    pub fn for_difficulty(difficulty: Option<Difficulty>) -> Self {
        match difficulty {
            Some(Difficulty::Easy) => Self {
                question_count: 15,
                duration_minutes: 45,
            },
            Some(Difficulty::Medium) => Self {
                question_count: 20,
                duration_minutes: 60,
            },
            Some(Difficulty::Hard) => Self {
                question_count: 25,
                duration_minutes: 75,
            },
            None => Self {
                question_count: 55,
                duration_minutes: 60,
            },
        }
    }

    pub fn config(&self) -> Result<ExamConfig, ConfigError> {
        ExamConfig::from_minutes(self.duration_minutes)
    }
}
