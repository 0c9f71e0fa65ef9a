use tracing::warn;

use crate::models::{ExamResult, QuestionView};
use crate::session::{ExamSession, TickOutcome};

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Exam,
    ConfirmSubmit,
    Overview,
    Result,
}

/// Screen state wrapped around one exam session.
pub struct App {
    pub state: AppState,
    session: ExamSession,
    option_cursor: usize,
    overview_cursor: usize,
    result_scroll: usize,
    unrecorded: Option<ExamResult>,
}

impl App {
    pub fn new(session: ExamSession) -> Self {
        Self {
            state: AppState::Welcome,
            session,
            option_cursor: 0,
            overview_cursor: 0,
            result_scroll: 0,
            unrecorded: None,
        }
    }

    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    pub fn current_question(&self) -> Option<QuestionView<'_>> {
        self.session.current_question()
    }

    pub fn current_question_number(&self) -> usize {
        self.session.current_index() + 1
    }

    pub fn total_questions(&self) -> usize {
        self.session.total_questions()
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn overview_cursor(&self) -> usize {
        self.overview_cursor
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn result(&self) -> Option<&ExamResult> {
        self.session.result()
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_submitted()
    }

    pub fn start_exam(&mut self) {
        if self.state == AppState::Welcome {
            self.state = AppState::Exam;
            self.sync_option_cursor();
        }
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.option_cursor = (self.option_cursor + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.option_cursor = (self.option_cursor + count - 1) % count;
        }
    }

    /// Record the option under the cursor as the answer to the current question.
    pub fn answer_selected_option(&mut self) {
        let Some((question_id, option_id)) = self.current_question().and_then(|question| {
            let option = question.options.get(self.option_cursor)?;
            Some((question.id.clone(), option.id.clone()))
        }) else {
            return;
        };

        if let Err(err) = self.session.select_answer(&question_id, &option_id) {
            warn!(error = %err, "answer rejected");
        }
    }

    pub fn clear_current_answer(&mut self) {
        let Some(question_id) = self.current_question().map(|q| q.id.clone()) else {
            return;
        };
        if let Err(err) = self.session.clear_answer(&question_id) {
            warn!(error = %err, "clear rejected");
        }
    }

    pub fn toggle_current_flag(&mut self) {
        let Some(question_id) = self.current_question().map(|q| q.id.clone()) else {
            return;
        };
        if let Err(err) = self.session.toggle_flag(&question_id) {
            warn!(error = %err, "flag rejected");
        }
    }

    pub fn next_question(&mut self) {
        if let Err(err) = self.session.next() {
            warn!(error = %err, "navigation rejected");
        }
        self.sync_option_cursor();
    }

    pub fn previous_question(&mut self) {
        if let Err(err) = self.session.previous() {
            warn!(error = %err, "navigation rejected");
        }
        self.sync_option_cursor();
    }

    pub fn open_overview(&mut self) {
        if matches!(self.state, AppState::Exam) {
            self.overview_cursor = self.session.current_index();
            self.state = AppState::Overview;
        }
    }

    pub fn overview_next(&mut self) {
        let total = self.total_questions();
        if total > 0 {
            self.overview_cursor = (self.overview_cursor + 1).min(total - 1);
        }
    }

    pub fn overview_previous(&mut self) {
        self.overview_cursor = self.overview_cursor.saturating_sub(1);
    }

    /// Jump to the question under the overview cursor and return to the exam.
    pub fn jump_to_overview_selection(&mut self) {
        if self.total_questions() > 0 {
            if let Err(err) = self.session.go_to(self.overview_cursor) {
                warn!(error = %err, "jump rejected");
            }
        }
        self.sync_option_cursor();
        self.back_to_exam();
    }

    pub fn request_submit(&mut self) {
        if matches!(self.state, AppState::Exam | AppState::Overview) {
            self.state = AppState::ConfirmSubmit;
        }
    }

    /// Leave the overview or the submit prompt.
    pub fn back_to_exam(&mut self) {
        if matches!(self.state, AppState::ConfirmSubmit | AppState::Overview) {
            self.state = AppState::Exam;
        }
    }

    pub fn submit(&mut self) {
        if self.session.is_submitted() {
            return;
        }
        let result = self.session.submit();
        self.finish(result);
    }

    /// Feed one clock tick to the session.
    pub fn on_tick(&mut self) {
        if let TickOutcome::Expired(result) = self.session.tick() {
            self.finish(result);
        }
    }

    /// The result of the submission that just happened, handed out once.
    pub fn take_unrecorded_result(&mut self) -> Option<ExamResult> {
        self.unrecorded.take()
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.total_questions().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn finish(&mut self, result: ExamResult) {
        self.unrecorded = Some(result);
        self.state = AppState::Result;
        self.result_scroll = 0;
    }

    fn option_count(&self) -> usize {
        self.current_question()
            .map(|question| question.options.len())
            .unwrap_or(0)
    }

    /// Put the option cursor on the recorded answer, or the first option.
    fn sync_option_cursor(&mut self) {
        self.option_cursor = self
            .current_question()
            .and_then(|question| {
                let selected = self.session.selected_answer(question.id)?;
                question.options.iter().position(|o| &o.id == selected)
            })
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionFilter;
    use crate::clock::Clock;
    use crate::config::ExamConfig;
    use crate::models::{AnswerOption, Difficulty, Question, QuestionId, Subject};

    fn app(count: usize, seconds: u32) -> App {
        let questions = (1..=count)
            .map(|n| {
                Question::new(
                    format!("q{n}"),
                    format!("question {n}"),
                    vec![
                        AnswerOption::new(format!("q{n}-a"), "a"),
                        AnswerOption::new(format!("q{n}-b"), "b"),
                        AnswerOption::new(format!("q{n}-c"), "c"),
                    ],
                    format!("q{n}-b"),
                    "topic",
                    Difficulty::Medium,
                    Subject::Math,
                )
                .unwrap()
            })
            .collect();
        let session = ExamSession::new(
            QuestionFilter::new(Subject::Math, Some(Difficulty::Medium)),
            questions,
            &ExamConfig::new(seconds).unwrap(),
            Clock::System,
        )
        .unwrap();
        App::new(session)
    }

    #[test]
    fn test_answer_follows_cursor() {
        let mut app = app(2, 60);
        app.start_exam();
        assert_eq!(app.state, AppState::Exam);

        app.select_next_option();
        app.answer_selected_option();
        let q1 = QuestionId::from("q1");
        assert_eq!(app.session().selected_answer(&q1).unwrap().as_str(), "q1-b");

        app.select_previous_option();
        app.select_previous_option();
        assert_eq!(app.option_cursor(), 2);
    }

    #[test]
    fn test_cursor_returns_to_recorded_answer() {
        let mut app = app(2, 60);
        app.start_exam();
        app.select_next_option();
        app.select_next_option();
        app.answer_selected_option();

        app.next_question();
        assert_eq!(app.option_cursor(), 0);
        app.previous_question();
        assert_eq!(app.option_cursor(), 2);
    }

    #[test]
    fn test_overview_jump() {
        let mut app = app(5, 60);
        app.start_exam();
        app.open_overview();
        assert_eq!(app.state, AppState::Overview);

        for _ in 0..10 {
            app.overview_next();
        }
        assert_eq!(app.overview_cursor(), 4);
        app.jump_to_overview_selection();
        assert_eq!(app.state, AppState::Exam);
        assert_eq!(app.current_question_number(), 5);
    }

    #[test]
    fn test_confirm_then_submit_records_once() {
        let mut app = app(3, 60);
        app.start_exam();
        app.toggle_current_flag();
        app.request_submit();
        assert_eq!(app.state, AppState::ConfirmSubmit);
        app.back_to_exam();
        assert_eq!(app.state, AppState::Exam);

        app.request_submit();
        app.submit();
        app.submit();
        assert_eq!(app.state, AppState::Result);
        assert!(app.take_unrecorded_result().is_some());
        assert!(app.take_unrecorded_result().is_none());
        app.on_tick();
        assert!(app.take_unrecorded_result().is_none());
    }

    #[test]
    fn test_expiry_moves_to_results() {
        let mut app = app(1, 2);
        app.start_exam();
        app.on_tick();
        assert_eq!(app.state, AppState::Exam);
        app.on_tick();
        assert_eq!(app.state, AppState::Result);
        assert!(app.is_finished());

        let result = app.take_unrecorded_result().unwrap();
        assert_eq!(result.time_spent_seconds, 2);
        assert_eq!(app.result(), Some(&result));
    }

    #[test]
    fn test_result_scroll_is_bounded() {
        let mut app = app(3, 60);
        app.submit();
        for _ in 0..5 {
            app.scroll_results_down();
        }
        assert_eq!(app.result_scroll(), 2);
        app.scroll_results_up();
        assert_eq!(app.result_scroll(), 1);
    }
}
