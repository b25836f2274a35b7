pub mod widgets;

use crate::controller::JokeController;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use widgets::{CategoryToggle, JokeStage, Marquee};

pub fn draw(frame: &mut Frame, controller: &JokeController, title: &str, tick: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(frame.area());

    Marquee::new(title, tick).render(frame, chunks[0]);
    CategoryToggle::new(controller.category()).render(frame, chunks[2]);
    JokeStage::new(controller, tick).render(frame, chunks[3]);
    render_footer(frame, controller, chunks[4]);
}

fn render_footer(frame: &mut Frame, controller: &JokeController, area: ratatui::layout::Rect) {
    let mut spans = vec![Span::styled(
        "1/2/Tab: category | Space: reveal | n: next | r: retry | q: quit",
        Style::default().fg(Color::DarkGray),
    )];

    if let Some(updated) = controller.last_updated() {
        spans.push(Span::styled(
            format!("  (last show {})", updated.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
