use crate::controller::{JokeController, Stage};
use crate::sources::Joke;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// The joke card: setup, punchline and whichever action is available.
pub struct JokeStage<'a> {
    controller: &'a JokeController,
    tick: usize,
}

impl<'a> JokeStage<'a> {
    pub fn new(controller: &'a JokeController, tick: usize) -> Self {
        Self { controller, tick }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Line::from(" ⛺ THE CODE STAGE ⛺ ").alignment(Alignment::Center))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.controller.stage() {
            Stage::Idle => self.render_notice(frame, inner, "Opening the gates...", Color::Gray),
            Stage::Fetching { .. } => self.render_loading(frame, inner),
            Stage::Failed { message } => self.render_error(frame, inner, message),
            Stage::ShowingSetup | Stage::ShowingPunchline => {
                if let Some(joke) = self.controller.current_joke() {
                    self.render_joke(frame, inner, joke, self.controller.revealed());
                }
            }
        }
    }

    fn render_notice(&self, frame: &mut Frame, area: Rect, text: &str, color: Color) {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(text.to_string(), Style::default().fg(color))),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let spinner = SPINNER[self.tick % SPINNER.len()];
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} 🎪 {}", spinner, spinner),
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "The performers are getting ready...",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
        ];

        let paragraph = Paragraph::new(text).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_error(&self, frame: &mut Frame, area: Rect, message: &str) {
        let mut text = vec![
            Line::from(""),
            Line::from("😅"),
            Line::from(""),
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[r] Try Again",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        // The last good joke stays on stage, dimmed, until a fetch succeeds.
        if let Some(joke) = self.controller.current_joke() {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                format!("Last act: \"{}\"", joke.setup),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_joke(&self, frame: &mut Frame, area: Rect, joke: &Joke, revealed: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Percentage(35),
                Constraint::Min(2),
            ])
            .split(area);

        let setup = Paragraph::new(format!("\"{}\"", joke.setup))
            .style(
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            );
        frame.render_widget(setup, chunks[0]);

        if revealed {
            let delivery = Paragraph::new(vec![
                Line::from(format!("\"{}\"", joke.delivery)),
                Line::from(Span::styled("✨ ✨ ✨", Style::default().fg(Color::Yellow))),
            ])
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)),
            );
            frame.render_widget(delivery, chunks[1]);

            let next = Paragraph::new(Line::from(Span::styled(
                "🎡 [n] NEXT PERFORMANCE! 🎡",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(next, chunks[2]);
        } else {
            let reveal = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "🎭 [space] REVEAL THE PUNCHLINE! 🎭",
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(reveal, chunks[1]);
        }
    }
}
