use crate::config::Config;
use crate::controller::{Completion, FetchTicket, JokeController, RequestId};
use crate::sources::{self, Category, Joke, JokeError, JokeSource};
use crate::ui;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Outcome of one fetch, sent back from the request task.
#[derive(Debug)]
pub struct JokeMessage {
    pub request: RequestId,
    pub category: Category,
    pub result: Result<Joke, JokeError>,
}

pub type SourceFactory = Box<dyn Fn(Category) -> Box<dyn JokeSource> + Send>;

pub struct App {
    title: String,
    tick_rate: Duration,
    controller: JokeController,
    sources: SourceFactory,
    // Category the last fetch was started for; a mismatch means the
    // category effect still has to run.
    fetched_category: Option<Category>,
    tx: mpsc::UnboundedSender<JokeMessage>,
    rx: mpsc::UnboundedReceiver<JokeMessage>,
    in_flight: Option<JoinHandle<()>>,
    tick: usize,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, category: Category) -> Self {
        let sources_config = config.sources.clone();
        let factory: SourceFactory =
            Box::new(move |category| sources::source_for(category, &sources_config));
        Self::with_sources(config, category, factory)
    }

    pub fn with_sources(config: Config, category: Category, sources: SourceFactory) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            title: config.general.title,
            tick_rate: Duration::from_millis(config.general.tick_rate_ms.max(10)),
            controller: JokeController::new(category),
            sources,
            fetched_category: None,
            tx,
            rx,
            in_flight: None,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn controller(&self) -> &JokeController {
        &self.controller
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Fetch whenever the selected category differs from the one last fetched.
    /// This also covers the very first fetch on start-up.
    pub fn sync_category_effect(&mut self) {
        let category = self.controller.category();
        if self.fetched_category != Some(category) {
            self.fetch_joke();
        }
    }

    pub fn fetch_joke(&mut self) {
        let ticket = self.controller.begin_fetch();
        self.spawn_fetch(ticket);
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                debug!("cancelling superseded fetch");
            }
            previous.abort();
        }

        self.fetched_category = Some(ticket.category);
        let source = (self.sources)(ticket.category);
        let tx = self.tx.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let result = source.fetch().await;
            // The receiver only goes away on shutdown.
            let _ = tx.send(JokeMessage {
                request: ticket.request,
                category: ticket.category,
                result,
            });
        }));
    }

    pub fn apply_message(&mut self, message: JokeMessage) -> Completion {
        debug!(category = %message.category, "fetch finished");
        self.controller.complete_fetch(message.request, message.result)
    }

    /// Apply everything that has arrived without waiting.
    pub fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply_message(message);
        }
    }

    /// Wait for the next fetch result.
    pub async fn next_message(&mut self) -> Option<JokeMessage> {
        self.rx.recv().await
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('1') | KeyCode::Char('p') => {
                self.controller.select_category(Category::Programming);
            }
            KeyCode::Char('2') | KeyCode::Char('a') => {
                self.controller.select_category(Category::Any);
            }
            KeyCode::Tab => {
                let next = self.controller.category().toggled();
                self.controller.select_category(next);
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.controller.reveal_punchline(),
            KeyCode::Char('n') => {
                if let Some(ticket) = self.controller.next_joke() {
                    self.spawn_fetch(ticket);
                }
            }
            KeyCode::Char('r') => {
                if let Some(ticket) = self.controller.retry() {
                    self.spawn_fetch(ticket);
                }
            }
            _ => {}
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            self.sync_category_effect();
            self.drain_messages();

            terminal.draw(|frame| ui::draw(frame, &self.controller, &self.title, self.tick))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
            self.tick = self.tick.wrapping_add(1);
        }

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::controller::Stage;

    struct CannedSource {
        joke: Option<Joke>,
        delay: Duration,
    }

    #[async_trait]
    impl JokeSource for CannedSource {
        fn name(&self) -> &str {
            "canned"
        }

        async fn fetch(&self) -> Result<Joke, JokeError> {
            tokio::time::sleep(self.delay).await;
            self.joke.clone().ok_or(JokeError::Response {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            })
        }
    }

    fn dark_mode() -> Joke {
        Joke {
            setup: "Why do programmers prefer dark mode?".to_string(),
            delivery: "Because light attracts bugs.".to_string(),
            kind: "twopart".to_string(),
            id: 1,
        }
    }

    fn chicken() -> Joke {
        Joke {
            setup: "Why did the chicken cross the road?".to_string(),
            delivery: "To get to the other side.".to_string(),
            kind: "random".to_string(),
            id: 42,
        }
    }

    fn app_with(programming: Option<Joke>, programming_delay: Duration) -> App {
        let factory: SourceFactory = Box::new(move |category| -> Box<dyn JokeSource> {
            match category {
                Category::Programming => Box::new(CannedSource {
                    joke: programming.clone(),
                    delay: programming_delay,
                }),
                Category::Any => Box::new(CannedSource {
                    joke: Some(chicken()),
                    delay: Duration::ZERO,
                }),
            }
        });
        App::with_sources(Config::default(), Category::Programming, factory)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn settle(app: &mut App) {
        let message = app.next_message().await.unwrap();
        app.apply_message(message);
    }

    #[tokio::test]
    async fn test_mount_fetch_reveal_next() {
        let mut app = app_with(Some(dark_mode()), Duration::ZERO);

        app.sync_category_effect();
        assert!(app.controller().loading());

        settle(&mut app).await;
        assert_eq!(app.controller().current_joke(), Some(&dark_mode()));
        assert!(!app.controller().revealed());

        // effect is satisfied, no second fetch
        app.sync_category_effect();
        assert_eq!(app.controller().stage(), &Stage::ShowingSetup);

        app.handle_key(press(KeyCode::Char(' ')));
        assert!(app.controller().revealed());

        app.handle_key(press(KeyCode::Char('n')));
        assert!(app.controller().loading());
        settle(&mut app).await;
        assert_eq!(app.controller().stage(), &Stage::ShowingSetup);
    }

    #[tokio::test]
    async fn test_category_key_triggers_fetch_through_effect() {
        let mut app = app_with(Some(dark_mode()), Duration::ZERO);
        app.sync_category_effect();
        settle(&mut app).await;
        app.handle_key(press(KeyCode::Char(' ')));

        app.handle_key(press(KeyCode::Char('2')));
        assert_eq!(app.controller().category(), Category::Any);
        assert!(app.controller().revealed());

        app.sync_category_effect();
        assert!(app.controller().loading());
        assert!(!app.controller().revealed());

        settle(&mut app).await;
        assert_eq!(app.controller().current_joke(), Some(&chicken()));
        assert_eq!(app.controller().current_joke().unwrap().kind, "random");
    }

    #[tokio::test]
    async fn test_same_category_does_not_refetch() {
        let mut app = app_with(Some(dark_mode()), Duration::ZERO);
        app.sync_category_effect();
        settle(&mut app).await;

        app.handle_key(press(KeyCode::Char('1')));
        app.sync_category_effect();
        assert_eq!(app.controller().stage(), &Stage::ShowingSetup);
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let mut app = app_with(None, Duration::ZERO);
        app.sync_category_effect();
        settle(&mut app).await;

        assert!(app.controller().error().is_some());
        assert!(!app.controller().loading());

        // reveal and next do nothing on the error screen
        app.handle_key(press(KeyCode::Char(' ')));
        app.handle_key(press(KeyCode::Char('n')));
        assert!(app.controller().error().is_some());

        app.handle_key(press(KeyCode::Char('r')));
        assert!(app.controller().loading());
        settle(&mut app).await;
        assert!(app.controller().error().is_some());
    }

    #[tokio::test]
    async fn test_switch_cancels_slow_fetch() {
        let mut app = app_with(Some(dark_mode()), Duration::from_millis(200));
        app.sync_category_effect();

        app.handle_key(press(KeyCode::Tab));
        app.sync_category_effect();

        settle(&mut app).await;
        assert_eq!(app.controller().current_joke(), Some(&chicken()));

        // the aborted programming request never reports back
        let late = tokio::time::timeout(Duration::from_millis(400), app.next_message()).await;
        assert!(late.is_err());
        assert_eq!(app.controller().current_joke(), Some(&chicken()));
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app_with(Some(dark_mode()), Duration::ZERO);
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit());

        let mut app = app_with(Some(dark_mode()), Duration::ZERO);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
