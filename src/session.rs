//! The timed exam state machine.
//!
//! An [`ExamSession`] starts `InProgress` and moves once, irreversibly, to
//! `Submitted`, either when [`ExamSession::submit`] is called or when
//! [`ExamSession::tick`] runs the countdown down to zero. Both paths score the
//! exam through the same code.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};
use uuid::Uuid;

use crate::bank::QuestionFilter;
use crate::clock::{Clock, format_remaining};
use crate::config::ExamConfig;
use crate::error::SessionError;
use crate::models::{
    Difficulty, ExamResult, OptionId, Question, QuestionId, QuestionOutcome, QuestionView, Subject,
    score_percentage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Submitted,
}

/// What a single [`ExamSession::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown moved; time is left.
    Running { remaining: u32 },
    /// The countdown hit zero and the exam was submitted in the same step.
    Expired(ExamResult),
    /// The session was already submitted; nothing changed.
    Idle,
}

/// One timed attempt at a fixed sequence of questions.
#[derive(Debug, Clone)]
pub struct ExamSession {
    id: Uuid,
    title: String,
    filter: QuestionFilter,
    questions: Vec<Question>,
    index_by_id: HashMap<QuestionId, usize>,
    /// Parallel to `questions`; `None` is unanswered.
    answers: Vec<Option<OptionId>>,
    flagged: HashSet<QuestionId>,
    current_index: usize,
    initial_seconds: u32,
    remaining_seconds: u32,
    status: SessionStatus,
    result: Option<ExamResult>,
    clock: Clock,
}

impl ExamSession {
    /// Create a session over `questions`, drawn from a bank with `filter`.
    /// An empty list is allowed.
    ///
    /// No timer is started; the owner drives [`tick`](Self::tick).
    pub fn new(
        filter: QuestionFilter,
        questions: Vec<Question>,
        config: &ExamConfig,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        let mut index_by_id = HashMap::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            if index_by_id.insert(question.id().clone(), index).is_some() {
                return Err(SessionError::DuplicateQuestion(question.id().clone()));
            }
        }

        let session = Self {
            id: Uuid::new_v4(),
            title: filter.title(),
            filter,
            answers: vec![None; questions.len()],
            questions,
            index_by_id,
            flagged: HashSet::new(),
            current_index: 0,
            initial_seconds: config.duration_seconds(),
            remaining_seconds: config.duration_seconds(),
            status: SessionStatus::InProgress,
            result: None,
            clock,
        };

        debug!(
            session = %session.id,
            questions = session.questions.len(),
            duration = session.initial_seconds,
            "exam session created"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subject(&self) -> Subject {
        self.filter.subject
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.filter.difficulty
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }

    /// The cached result, once submitted.
    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn initial_seconds(&self) -> u32 {
        self.initial_seconds
    }

    pub fn current_question(&self) -> Option<QuestionView<'_>> {
        self.questions.get(self.current_index).map(Question::view)
    }

    pub fn question_views(&self) -> impl Iterator<Item = QuestionView<'_>> {
        self.questions.iter().map(Question::view)
    }

    pub fn selected_answer(&self, question_id: &QuestionId) -> Option<&OptionId> {
        let index = *self.index_by_id.get(question_id)?;
        self.answers[index].as_ref()
    }

    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.selected_answer(question_id).is_some()
    }

    pub fn is_flagged(&self, question_id: &QuestionId) -> bool {
        self.flagged.contains(question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_some()).count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.questions.len() - self.answered_count()
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged.len()
    }

    /// Share of answered questions as a whole percentage; 0 with no questions.
    pub fn progress_percentage(&self) -> u32 {
        score_percentage(self.answered_count(), self.questions.len())
    }

    pub fn formatted_time_remaining(&self) -> String {
        format_remaining(self.remaining_seconds)
    }

    pub fn select_answer(
        &mut self,
        question_id: &QuestionId,
        option_id: &OptionId,
    ) -> Result<(), SessionError> {
        let index = self.mutable_index(question_id)?;
        if !self.questions[index].has_option(option_id) {
            return Err(SessionError::InvalidOptionReference {
                question: question_id.clone(),
                option: option_id.clone(),
            });
        }

        self.answers[index] = Some(option_id.clone());
        Ok(())
    }

    /// Return a question to unanswered.
    pub fn clear_answer(&mut self, question_id: &QuestionId) -> Result<(), SessionError> {
        let index = self.mutable_index(question_id)?;
        self.answers[index] = None;
        Ok(())
    }

    /// Flip the review flag on a question and return whether it is now flagged.
    pub fn toggle_flag(&mut self, question_id: &QuestionId) -> Result<bool, SessionError> {
        self.mutable_index(question_id)?;
        if self.flagged.remove(question_id) {
            Ok(false)
        } else {
            self.flagged.insert(question_id.clone());
            Ok(true)
        }
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        if index >= self.questions.len() {
            return Err(SessionError::InvalidQuestionReference(format!(
                "#{}",
                index.saturating_add(1)
            )));
        }
        self.current_index = index;
        Ok(())
    }

    /// Move forward; stays put on the last question.
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        }
        Ok(())
    }

    /// Move back; stays put on the first question.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.current_index = self.current_index.saturating_sub(1);
        Ok(())
    }

    /// Advance the countdown by one second, submitting when it reaches zero.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_submitted() {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Running {
                remaining: self.remaining_seconds,
            };
        }

        info!(session = %self.id, "time expired, submitting exam");
        TickOutcome::Expired(self.submit())
    }

    /// Submit and score the exam.
    ///
    /// Only the first call scores; later calls return the same result.
    pub fn submit(&mut self) -> ExamResult {
        if let Some(result) = &self.result {
            return result.clone();
        }

        let answers: Vec<QuestionOutcome> = self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(question, answer)| {
                let correct = question.correct_option_id();
                QuestionOutcome {
                    question_id: question.id().clone(),
                    question_text: question.text().to_string(),
                    topic: question.topic().to_string(),
                    user_answer: answer.clone(),
                    correct_answer: correct.clone(),
                    is_correct: answer.as_ref() == Some(correct),
                }
            })
            .collect();

        let correct_count = answers.iter().filter(|outcome| outcome.is_correct).count();
        let result = ExamResult {
            session_id: self.id,
            title: self.title.clone(),
            subject: self.filter.subject,
            difficulty: self.filter.difficulty,
            total_questions: self.questions.len(),
            correct_count,
            score: score_percentage(correct_count, self.questions.len()),
            time_spent_seconds: self.initial_seconds - self.remaining_seconds,
            submitted_at: self.clock.now(),
            answers,
        };

        self.status = SessionStatus::Submitted;
        self.result = Some(result.clone());

        info!(
            session = %self.id,
            correct = result.correct_count,
            total = result.total_questions,
            score = result.score,
            "exam submitted"
        );
        result
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::SessionAlreadySubmitted);
        }
        Ok(())
    }

    fn mutable_index(&self, question_id: &QuestionId) -> Result<usize, SessionError> {
        self.ensure_in_progress()?;
        self.index_by_id
            .get(question_id)
            .copied()
            .ok_or_else(|| SessionError::InvalidQuestionReference(question_id.to_string()))
    }
}
