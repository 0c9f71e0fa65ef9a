use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::question::{Difficulty, OptionId, QuestionId, Subject};

/// Summary of a submitted exam, as recorded in the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub session_id: Uuid,
    pub title: String,
    pub subject: Subject,
    /// `None` for a mixed-difficulty exam.
    pub difficulty: Option<Difficulty>,
    pub total_questions: usize,
    pub correct_count: usize,
    /// Whole percentage, half rounding up.
    pub score: u32,
    pub time_spent_seconds: u32,
    pub submitted_at: DateTime<Utc>,
    pub answers: Vec<QuestionOutcome>,
}

/// How a single question was answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub question_text: String,
    pub topic: String,
    pub user_answer: Option<OptionId>,
    pub correct_answer: OptionId,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
            Grade::D => 'D',
            Grade::F => 'F',
        }
    }
}

impl ExamResult {
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score)
    }

    pub fn unanswered_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|outcome| outcome.user_answer.is_none())
            .count()
    }

    /// Time spent rendered as `Xm Ys`.
    pub fn formatted_time_spent(&self) -> String {
        format!(
            "{}m {}s",
            self.time_spent_seconds / 60,
            self.time_spent_seconds % 60
        )
    }
}

/// `round(correct / total * 100)` without floating point; 0 for an empty exam.
pub fn score_percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct * 100 + total / 2) / total) as u32
}
