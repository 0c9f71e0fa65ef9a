//! # gat-exam
//!
//! A terminal runner for timed GAT practice exams.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gat_exam::{Exam, ExamError, HistoryFile, InMemoryBank, QuestionFilter, Subject};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ExamError> {
//!     let bank = InMemoryBank::new(gat_exam::load_questions_from_json("questions.json")?);
//!     let filter = QuestionFilter::new(Subject::Math, None);
//!     let exam = Exam::assemble(&bank, filter, None, HistoryFile::new("history.jsonl"))?;
//!     if let Some(result) = exam.run().await? {
//!         println!("scored {}%", result.score);
//!     }
//!     Ok(())
//! }
//! ```

mod app;
mod bank;
mod clock;
mod config;
mod error;
mod models;
mod session;
mod sink;
pub mod terminal;
mod ui;

use std::future;
use std::io;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

pub use app::{App, AppState};
pub use bank::{
    InMemoryBank, QuestionBank, QuestionFilter, SelectionPolicy, generate_questions,
    load_questions_from_json,
};
pub use clock::{Clock, Ticker, format_remaining};
pub use config::{ExamConfig, ExamPreset};
pub use error::{ConfigError, ExamError, LoadError, SessionError};
pub use models::{
    AnswerOption, Difficulty, ExamResult, Grade, OptionId, ParseTagError, Question, QuestionId,
    QuestionOutcome, QuestionView, Subject, score_percentage,
};
pub use session::{ExamSession, SessionStatus, TickOutcome};
pub use sink::{HistoryFile, MemorySink, ResultsSink, load_history};

/// An exam ready to run in the terminal, with the sink its result goes to.
pub struct Exam {
    app: App,
    sink: Box<dyn ResultsSink>,
}

impl Exam {
    pub fn new(session: ExamSession, sink: impl ResultsSink + 'static) -> Self {
        Self {
            app: App::new(session),
            sink: Box::new(sink),
        }
    }

    /// Draw questions from `bank` with the default selection policy and the
    /// preset for the filter's difficulty. `duration` overrides the preset's
    /// time limit.
    pub fn assemble<B>(
        bank: &B,
        filter: QuestionFilter,
        duration: Option<ExamConfig>,
        sink: impl ResultsSink + 'static,
    ) -> Result<Self, ExamError>
    where
        B: QuestionBank + ?Sized,
    {
        let preset = ExamPreset::for_difficulty(filter.difficulty);
        let config = match duration {
            Some(config) => config,
            None => preset.config()?,
        };

        let questions = SelectionPolicy::default()
            .with_max_questions(preset.question_count)
            .select(bank, &filter, &mut rand::rng());

        let session = ExamSession::new(filter, questions, &config, Clock::System)?;
        info!(
            title = session.title(),
            questions = session.total_questions(),
            duration = config.duration_seconds(),
            "exam assembled"
        );
        Ok(Self::new(session, sink))
    }

    /// Take over the terminal until the user quits, returning the result if
    /// the exam was submitted.
    ///
    /// Must be called from inside a tokio runtime of either flavour; the
    /// countdown runs on a spawned task and the loop awaits input and ticks
    /// together.
    pub async fn run(mut self) -> Result<Option<ExamResult>, ExamError> {
        let mut term = terminal::init()?;
        let mut events = EventStream::new();
        let outcome = run_event_loop(
            &mut events,
            |app| term.draw(|frame| ui::render(frame, app)).map(|_| ()),
            &mut self.app,
            self.sink.as_mut(),
        )
        .await;
        terminal::restore()?;
        outcome?;
        Ok(self.app.result().cloned())
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop<S, D>(
    events: &mut S,
    mut draw: D,
    app: &mut App,
    sink: &mut dyn ResultsSink,
) -> Result<(), ExamError>
where
    S: Stream<Item = io::Result<Event>> + Unpin,
    D: FnMut(&App) -> io::Result<()>,
{
    let mut ticker: Option<Ticker> = None;

    loop {
        draw(app)?;

        if ticker.is_none() && app.state != AppState::Welcome && !app.is_finished() {
            debug!("starting exam countdown");
            ticker = Some(Ticker::every_second());
        }

        let mut quit = false;
        tokio::select! {
            Some(()) = next_tick(&mut ticker) => {
                if let Some(ticker) = ticker.as_mut() {
                    advance_clock(app, ticker, sink);
                }
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    quit = handle_input(app, key.code);
                    record_submission(app, ticker.as_mut(), sink);
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => quit = true,
            },
        }

        if quit {
            if !app.is_finished() {
                info!(
                    session = %app.session().id(),
                    "exam abandoned before submission"
                );
            }
            break;
        }
    }

    Ok(())
}

/// Resolves with the next tick, or never once the countdown is stopped.
async fn next_tick(ticker: &mut Option<Ticker>) -> Option<()> {
    match ticker {
        Some(ticker) if !ticker.is_cancelled() => ticker.next().await,
        _ => future::pending().await,
    }
}

/// Feed one delivered tick, plus any that queued up behind it, to the app.
fn advance_clock(app: &mut App, ticker: &mut Ticker, sink: &mut dyn ResultsSink) {
    app.on_tick();
    for _ in 0..ticker.take_pending() {
        app.on_tick();
    }
    record_submission(app, Some(ticker), sink);
}

/// Stop the countdown and hand a just-submitted result to the sink.
fn record_submission(app: &mut App, ticker: Option<&mut Ticker>, sink: &mut dyn ResultsSink) {
    let Some(result) = app.take_unrecorded_result() else {
        return;
    };
    if let Some(ticker) = ticker {
        ticker.cancel();
    }
    sink.record(&result);
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    match app.state {
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Exam => handle_exam_input(app, key),
        AppState::ConfirmSubmit => handle_confirm_input(app, key),
        AppState::Overview => handle_overview_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter => {
            app.start_exam();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_exam_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.answer_selected_option(),
        KeyCode::Char('x') => app.clear_current_answer(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.previous_question(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.next_question(),
        KeyCode::Char('f') => app.toggle_current_flag(),
        KeyCode::Char('g') => app.open_overview(),
        KeyCode::Char('s') => app.request_submit(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_confirm_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.submit(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.back_to_exam(),
        _ => {}
    }
    false
}

fn handle_overview_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
            app.overview_next()
        }
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
            app.overview_previous()
        }
        KeyCode::Enter => app.jump_to_overview_selection(),
        KeyCode::Char('s') => app.request_submit(),
        KeyCode::Esc | KeyCode::Char('g') => app.back_to_exam(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}
