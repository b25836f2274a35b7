use crate::sources::Category;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// The two category buttons and the badge for the active one.
pub struct CategoryToggle {
    active: Category,
}

impl CategoryToggle {
    pub fn new(active: Category) -> Self {
        Self { active }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let buttons = Line::from(vec![
            self.button(Category::Programming, "[1] 🤓 Programmer Jokes"),
            Span::raw("   "),
            self.button(Category::Any, "[2] 🎭 Random Jokes"),
        ]);

        let badge = Line::from(Span::styled(
            format!("🎟  {}", self.active.badge()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        let paragraph = Paragraph::new(vec![buttons, Line::from(""), badge])
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn button(&self, category: Category, label: &'static str) -> Span<'static> {
        let style = if category == self.active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!(" {} ", label), style)
    }
}
