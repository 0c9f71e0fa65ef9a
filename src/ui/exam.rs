use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{AnswerOption, OptionId};

const OPTION_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
const LOW_TIME_SECONDS: u32 = 5 * 60;
const OVERVIEW_COLUMNS: usize = 10;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_progress(frame, chunks[1], app);

    let Some(question) = app.current_question() else {
        let widget = Paragraph::new("No questions are available for this exam.")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, chunks[2]);
        render_controls(frame, chunks[4]);
        return;
    };

    render_question_text(frame, chunks[2], question.text);
    render_options(
        frame,
        chunks[3],
        question.options,
        app.option_cursor(),
        app.session().selected_answer(question.id),
    );
    render_controls(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let remaining = session.remaining_seconds();
    let timer_color = if remaining <= LOW_TIME_SECONDS {
        Color::Red
    } else {
        Color::Green
    };

    let flag = app
        .current_question()
        .filter(|question| session.is_flagged(question.id))
        .map(|_| Span::styled("  ⚑ flagged", Style::default().fg(Color::Yellow)))
        .unwrap_or_default();

    let left = Line::from(vec![
        Span::styled(
            format!("{}/{}", app.current_question_number(), app.total_questions()),
            Style::default().fg(Color::DarkGray),
        ),
        flag,
    ]);
    let right = Line::from(Span::styled(
        session.formatted_time_remaining(),
        Style::default().fg(timer_color).bold(),
    ));

    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);
    frame.render_widget(Paragraph::new(left), halves[0]);
    frame.render_widget(
        Paragraph::new(right).alignment(Alignment::Right),
        halves[1],
    );
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let percent = session.progress_percentage();
    let label = format!(
        "{} of {} answered ({}%)",
        session.answered_count(),
        session.total_questions(),
        percent
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .percent(percent.min(100) as u16)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[AnswerOption],
    cursor: usize,
    answer: Option<&OptionId>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_cursor = index == cursor;
        let is_answer = answer == Some(&option.id);
        let style = match (is_cursor, is_answer) {
            (true, _) => Style::default().fg(Color::Cyan).bold(),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_cursor { ">" } else { " " };
        let check = if is_answer { "●" } else { "○" };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{} {}. ", check, label), style),
            Span::styled(option.text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(
        "j/k move · enter answer · x clear · h/l prev/next · f flag · g overview · s submit · q quit",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

pub fn render_confirm_submit(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let unanswered = session.unanswered_count();
    let flagged = session.flagged_count();

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Submit exam?",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
    ];
    if unanswered > 0 {
        content.push(Line::from(Span::styled(
            format!("{} question(s) are still unanswered.", unanswered),
            Style::default().fg(Color::Yellow),
        )));
    }
    if flagged > 0 {
        content.push(Line::from(Span::styled(
            format!("{} question(s) are flagged for review.", flagged),
            Style::default().fg(Color::Yellow),
        )));
    }
    content.push(Line::from(""));
    content.push(Line::from("y submit  ·  n keep working".fg(Color::DarkGray)));

    let popup = super::centered(area, 50, 9);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(content).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::Cyan),
        ),
        popup,
    );
}

pub fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let session = app.session();
    let header = Line::from(vec![
        Span::styled("QUESTIONS", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(
                "   {} answered · {} flagged · {} left",
                session.answered_count(),
                session.flagged_count(),
                session.formatted_time_remaining()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let cells: Vec<Span> = session
        .question_views()
        .enumerate()
        .map(|(index, question)| {
            let mut style = if session.is_answered(question.id) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            if session.is_flagged(question.id) {
                style = style.fg(Color::Yellow);
            }
            if index == app.overview_cursor() {
                style = style.reversed();
            }
            Span::styled(format!(" {:>3} ", index + 1), style)
        })
        .collect();

    let lines: Vec<Line> = cells
        .chunks(OVERVIEW_COLUMNS)
        .map(|row| Line::from(row.to_vec()))
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray)
                .padding(Padding::uniform(1)),
        ),
        chunks[1],
    );

    let controls = Paragraph::new("j/k move · enter jump · s submit · esc back")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[2]);
}
