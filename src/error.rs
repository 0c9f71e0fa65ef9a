//! Error types for the exam runner.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{OptionId, QuestionId};

/// Contract violations raised by [`ExamSession`](crate::ExamSession).
///
/// None of these are transient; there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The question id or index is not part of this session.
    #[error("question {0} is not part of this session")]
    InvalidQuestionReference(String),

    /// The option does not belong to the referenced question.
    #[error("option {option} does not belong to question {question}")]
    InvalidOptionReference {
        question: QuestionId,
        option: OptionId,
    },

    /// A mutating operation was attempted after submission.
    #[error("the session has already been submitted")]
    SessionAlreadySubmitted,

    /// Two questions in the same session share an id.
    #[error("question id {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

/// Invalid exam configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("exam duration must be greater than zero seconds")]
    ZeroDuration,
}

/// Errors reading question banks and history files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid question {id}: {reason}")]
    InvalidQuestion { id: String, reason: String },

    #[error("{} must contain at least one question", .0.display())]
    Empty(PathBuf),
}

/// Top-level error for running an exam.
#[derive(Debug, Error)]
pub enum ExamError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
