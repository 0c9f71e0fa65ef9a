mod exam;
mod result;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, AppState};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Welcome => welcome::render(frame, area, app),
        AppState::Exam => exam::render(frame, area, app),
        AppState::ConfirmSubmit => {
            exam::render(frame, area, app);
            exam::render_confirm_submit(frame, area, app);
        }
        AppState::Overview => exam::render_overview(frame, area, app),
        AppState::Result => result::render(frame, area, app),
    }
}

/// A `width` x `height` rectangle centred in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
