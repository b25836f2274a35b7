use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SUBTITLE: &str = "Step right up for the funniest programming jokes on earth!";

/// Title banner with a row of twinkling stars.
pub struct Marquee<'a> {
    title: &'a str,
    tick: usize,
}

impl<'a> Marquee<'a> {
    pub fn new(title: &'a str, tick: usize) -> Self {
        Self { title, tick }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(Span::styled(
                format!("🎪 {} 🎪", self.title),
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                SUBTITLE,
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(self.stars()),
        ];

        let paragraph = Paragraph::new(text).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn stars(&self) -> Vec<Span<'static>> {
        (0..3)
            .map(|i| {
                // stagger so the stars blink one after another
                let lit = (self.tick / 5 + i) % 3 != 0;
                let style = if lit {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Span::styled(" ★ ", style)
            })
            .collect()
    }
}
