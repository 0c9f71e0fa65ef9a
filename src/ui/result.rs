use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::{ExamResult, Grade};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(result) = app.result() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], result);
    render_question_breakdown(frame, chunks[2], app.result_scroll(), result);
    render_controls(frame, chunks[3]);
}

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::A => Color::Green,
        Grade::B => Color::Cyan,
        Grade::C => Color::Yellow,
        Grade::D => Color::LightRed,
        Grade::F => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, result: &ExamResult) {
    let grade = result.grade();
    let color = grade_color(grade);

    let content = vec![
        Line::from(Span::styled(
            result.title.to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({}%)  ·  grade {}",
                result.correct_count,
                result.total_questions,
                result.score,
                grade.letter()
            ),
            Style::default().fg(color).bold(),
        )),
        Line::from(""),
        Line::from(
            format!(
                "time spent {}  ·  unanswered {}  ·  submitted {}",
                result.formatted_time_spent(),
                result.unanswered_count(),
                result.submitted_at.format("%Y-%m-%d %H:%M")
            )
            .fg(Color::DarkGray),
        ),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, scroll: usize, result: &ExamResult) {
    let lines: Vec<Line> = result
        .answers
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let (symbol, color) = match (&outcome.user_answer, outcome.is_correct) {
                (_, true) => ("+", Color::Green),
                (None, false) => ("·", Color::DarkGray),
                (Some(_), false) => ("-", Color::Red),
            };

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("[{}] ", outcome.topic),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate_question(&outcome.question_text),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
