use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::LoadError;
use crate::models::{AnswerOption, Difficulty, Question, Subject};

/// A question as stored on disk: the correct option is marked inline.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredQuestion {
    id: String,
    #[serde(default)]
    topic: String,
    difficulty: Difficulty,
    subject: Subject,
    text: String,
    options: Vec<StoredOption>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOption {
    id: String,
    text: String,
    #[serde(default)]
    is_correct: bool,
}

impl TryFrom<StoredQuestion> for Question {
    type Error = LoadError;

    fn try_from(stored: StoredQuestion) -> Result<Self, Self::Error> {
        let mut correct = stored.options.iter().filter(|option| option.is_correct);
        let correct_id = match (correct.next(), correct.next()) {
            (Some(option), None) => option.id.clone(),
            (None, _) => {
                return Err(LoadError::InvalidQuestion {
                    id: stored.id,
                    reason: "no option is marked correct".to_string(),
                });
            }
            (Some(_), Some(_)) => {
                return Err(LoadError::InvalidQuestion {
                    id: stored.id,
                    reason: "more than one option is marked correct".to_string(),
                });
            }
        };

        let options = stored
            .options
            .into_iter()
            .map(|option| AnswerOption::new(option.id, option.text))
            .collect();

        Question::new(
            stored.id,
            stored.text,
            options,
            correct_id,
            stored.topic,
            stored.difficulty,
            stored.subject,
        )
    }
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let stored: Vec<StoredQuestion> =
        serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if stored.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let questions = stored
        .into_iter()
        .map(Question::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = %path.display(), count = questions.len(), "loaded question bank");
    Ok(questions)
}
