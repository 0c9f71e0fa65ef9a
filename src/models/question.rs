use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LoadError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a question, stable within a session.
    QuestionId
);

string_id!(
    /// Identifier of an answer option, unique within its question.
    OptionId
);

/// Error parsing a subject or difficulty tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseTagError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Arabic,
}

impl Subject {
    pub const ALL: [Subject; 2] = [Subject::Math, Subject::Arabic];

    pub fn label(self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Arabic => "Arabic",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Math => f.write_str("math"),
            Subject::Arabic => f.write_str("arabic"),
        }
    }
}

impl FromStr for Subject {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "math" => Ok(Subject::Math),
            "arabic" => Ok(Subject::Arabic),
            _ => Err(ParseTagError {
                kind: "subject",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("easy"),
            Difficulty::Medium => f.write_str("medium"),
            Difficulty::Hard => f.write_str("hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseTagError {
                kind: "difficulty",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
}

impl AnswerOption {
    pub fn new(id: impl Into<OptionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A multiple-choice question.
///
/// The correct option is held apart from the options themselves and is only
/// readable inside the crate; anything that renders a question works with a
/// [`QuestionView`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<AnswerOption>,
    correct_option_id: OptionId,
    topic: String,
    difficulty: Difficulty,
    subject: Subject,
}

impl Question {
    /// Build a question, checking that it has at least two uniquely
    /// identified options and that the correct option is one of them.
    pub fn new(
        id: impl Into<QuestionId>,
        text: impl Into<String>,
        options: Vec<AnswerOption>,
        correct_option_id: impl Into<OptionId>,
        topic: impl Into<String>,
        difficulty: Difficulty,
        subject: Subject,
    ) -> Result<Self, LoadError> {
        let id = id.into();
        let correct_option_id = correct_option_id.into();
        let invalid = |reason: String| LoadError::InvalidQuestion {
            id: id.to_string(),
            reason,
        };

        if id.as_str().trim().is_empty() {
            return Err(invalid("question id is empty".to_string()));
        }
        if options.len() < 2 {
            return Err(invalid(format!(
                "needs at least 2 options, found {}",
                options.len()
            )));
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(&option.id) {
                return Err(invalid(format!("option id {} is repeated", option.id)));
            }
        }
        if !seen.contains(&correct_option_id) {
            return Err(invalid(format!(
                "correct option {} is not among its options",
                correct_option_id
            )));
        }

        Ok(Self {
            id,
            text: text.into(),
            options,
            correct_option_id,
            topic: topic.into(),
            difficulty,
            subject,
        })
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn has_option(&self, option_id: &OptionId) -> bool {
        self.options.iter().any(|option| &option.id == option_id)
    }

    pub(crate) fn correct_option_id(&self) -> &OptionId {
        &self.correct_option_id
    }

    pub fn view(&self) -> QuestionView<'_> {
        QuestionView {
            id: &self.id,
            text: &self.text,
            options: &self.options,
            topic: &self.topic,
            difficulty: self.difficulty,
            subject: self.subject,
        }
    }
}

/// The test-taker's view of a question: everything except the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub id: &'a QuestionId,
    pub text: &'a str,
    pub options: &'a [AnswerOption],
    pub topic: &'a str,
    pub difficulty: Difficulty,
    pub subject: Subject,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<AnswerOption> {
        vec![
            AnswerOption::new("a", "2"),
            AnswerOption::new("b", "3"),
            AnswerOption::new("c", "4"),
        ]
    }

    #[test]
    fn test_new_accepts_valid_question() {
        let question = Question::new(
            "q1",
            "If x + 3 = 7, what is x?",
            options(),
            "c",
            "algebra",
            Difficulty::Easy,
            Subject::Math,
        )
        .unwrap();

        assert_eq!(question.id().as_str(), "q1");
        assert_eq!(question.correct_option_id().as_str(), "c");
        assert!(question.has_option(&OptionId::from("b")));
        assert!(!question.has_option(&OptionId::from("z")));
    }

    #[test]
    fn test_new_rejects_unknown_correct_option() {
        let err = Question::new(
            "q1",
            "text",
            options(),
            "z",
            "algebra",
            Difficulty::Easy,
            Subject::Math,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not among its options"));
    }

    #[test]
    fn test_new_rejects_single_option_and_duplicates() {
        let single = vec![AnswerOption::new("a", "only")];
        assert!(
            Question::new("q1", "t", single, "a", "x", Difficulty::Easy, Subject::Math).is_err()
        );

        let repeated = vec![AnswerOption::new("a", "1"), AnswerOption::new("a", "2")];
        assert!(
            Question::new("q1", "t", repeated, "a", "x", Difficulty::Easy, Subject::Math)
                .is_err()
        );
    }

    #[test]
    fn test_view_has_no_answer_field() {
        let question = Question::new(
            "q1",
            "text",
            options(),
            "a",
            "algebra",
            Difficulty::Hard,
            Subject::Arabic,
        )
        .unwrap();
        let view = question.view();

        assert_eq!(view.id, question.id());
        assert_eq!(view.options.len(), 3);
        assert_eq!(view.difficulty, Difficulty::Hard);
        // The rendered form of a view must not mention which option is right.
        assert!(!format!("{:?}", view).contains("correct"));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("Math".parse::<Subject>().unwrap(), Subject::Math);
        assert_eq!(" arabic ".parse::<Subject>().unwrap(), Subject::Arabic);
        assert!("physics".parse::<Subject>().is_err());
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("random".parse::<Difficulty>().is_err());
    }
}
