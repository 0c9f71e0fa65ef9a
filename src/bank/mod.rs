//! Question sources and the policy for assembling an exam from them.

mod generator;
mod loader;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

pub use generator::generate_questions;
pub use loader::load_questions_from_json;

use crate::models::{Difficulty, Question, Subject};

/// Which questions an exam wants. `difficulty: None` accepts any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionFilter {
    pub subject: Subject,
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilter {
    pub fn new(subject: Subject, difficulty: Option<Difficulty>) -> Self {
        Self {
            subject,
            difficulty,
        }
    }

    pub fn matches(&self, question: &Question) -> bool {
        question.subject() == self.subject
            && self
                .difficulty
                .is_none_or(|difficulty| question.difficulty() == difficulty)
    }

    /// The same subject at any difficulty.
    pub fn widened(&self) -> Self {
        Self::new(self.subject, None)
    }

    /// Display name of an exam drawn with this filter, e.g. `Math GAT (easy)`.
    pub fn title(&self) -> String {
        match self.difficulty {
            Some(difficulty) => format!("{} GAT ({})", self.subject.label(), difficulty),
            None => format!("{} GAT (mixed)", self.subject.label()),
        }
    }
}

pub trait QuestionBank {
    /// Questions matching `filter`, in bank order.
    fn fetch(&self, filter: &QuestionFilter) -> Vec<Question>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBank {
    questions: Vec<Question>,
}

impl InMemoryBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionBank for InMemoryBank {
    fn fetch(&self, filter: &QuestionFilter) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|question| filter.matches(question))
            .cloned()
            .collect()
    }
}

/// How an exam's question list is drawn from a bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Below this many matches the difficulty filter is dropped.
    pub min_matches: usize,
    pub max_questions: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            min_matches: 5,
            max_questions: 55,
        }
    }
}

impl SelectionPolicy {
    pub fn with_max_questions(mut self, max_questions: usize) -> Self {
        self.max_questions = max_questions;
        self
    }

    /// Fetch, widen if too few matched, shuffle and cap.
    pub fn select<B, R>(&self, bank: &B, filter: &QuestionFilter, rng: &mut R) -> Vec<Question>
    where
        B: QuestionBank + ?Sized,
        R: Rng + ?Sized,
    {
        let mut questions = bank.fetch(filter);

        if questions.len() < self.min_matches && filter.difficulty.is_some() {
            let widened = filter.widened();
            info!(
                subject = %filter.subject,
                matched = questions.len(),
                min = self.min_matches,
                "too few questions for difficulty, widening to whole subject"
            );
            questions = bank.fetch(&widened);
        }

        questions.shuffle(rng);
        questions.truncate(self.max_questions);
        questions
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::AnswerOption;

    fn question(id: &str, subject: Subject, difficulty: Difficulty) -> Question {
        Question::new(
            id,
            "text",
            vec![AnswerOption::new("a", "1"), AnswerOption::new("b", "2")],
            "a",
            "topic",
            difficulty,
            subject,
        )
        .unwrap()
    }

    fn bank() -> InMemoryBank {
        let mut questions = Vec::new();
        for n in 0..6 {
            questions.push(question(&format!("me{n}"), Subject::Math, Difficulty::Easy));
        }
        for n in 0..2 {
            questions.push(question(&format!("mh{n}"), Subject::Math, Difficulty::Hard));
        }
        for n in 0..3 {
            questions.push(question(&format!("ae{n}"), Subject::Arabic, Difficulty::Easy));
        }
        InMemoryBank::new(questions)
    }

    #[test]
    fn test_fetch_filters_subject_and_difficulty() {
        let bank = bank();
        assert_eq!(bank.len(), 11);
        assert_eq!(
            bank.fetch(&QuestionFilter::new(Subject::Math, Some(Difficulty::Easy)))
                .len(),
            6
        );
        assert_eq!(bank.fetch(&QuestionFilter::new(Subject::Math, None)).len(), 8);
        assert_eq!(
            bank.fetch(&QuestionFilter::new(Subject::Arabic, Some(Difficulty::Hard)))
                .len(),
            0
        );
    }

    #[test]
    fn test_filter_title() {
        let filter = QuestionFilter::new(Subject::Arabic, Some(Difficulty::Hard));
        assert_eq!(filter.title(), "Arabic GAT (hard)");
        assert_eq!(filter.widened().title(), "Arabic GAT (mixed)");
    }

    #[test]
    fn test_select_keeps_filter_when_enough_match() {
        let mut rng = StdRng::seed_from_u64(7);
        let filter = QuestionFilter::new(Subject::Math, Some(Difficulty::Easy));
        let selected = SelectionPolicy::default().select(&bank(), &filter, &mut rng);

        assert_eq!(selected.len(), 6);
        assert!(selected.iter().all(|q| q.difficulty() == Difficulty::Easy));
    }

    #[test]
    fn test_select_widens_when_too_few_match() {
        let mut rng = StdRng::seed_from_u64(7);
        let filter = QuestionFilter::new(Subject::Math, Some(Difficulty::Hard));
        let selected = SelectionPolicy::default().select(&bank(), &filter, &mut rng);

        assert_eq!(selected.len(), 8);
        assert!(selected.iter().all(|q| q.subject() == Subject::Math));
    }

    #[test]
    fn test_select_threshold_is_configurable() {
        let mut rng = StdRng::seed_from_u64(7);
        let policy = SelectionPolicy {
            min_matches: 2,
            max_questions: 55,
        };
        let filter = QuestionFilter::new(Subject::Math, Some(Difficulty::Hard));
        assert_eq!(policy.select(&bank(), &filter, &mut rng).len(), 2);
    }

    #[test]
    fn test_select_caps_question_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let filter = QuestionFilter::new(Subject::Math, None);
        let selected = SelectionPolicy::default()
            .with_max_questions(3)
            .select(&bank(), &filter, &mut rng);
        assert_eq!(selected.len(), 3);
    }
}
