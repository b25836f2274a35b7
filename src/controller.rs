//! Joke booth state machine.
//!
//! The controller owns all UI state and never performs IO. Starting a fetch
//! hands out a [`FetchTicket`]; whoever runs the request reports back through
//! [`JokeController::complete_fetch`]. Tickets are numbered so a completion for
//! a request that has since been superseded is dropped instead of overwriting
//! newer state.

use crate::sources::{Category, Joke, JokeError, FETCH_FAILED_MESSAGE};
use chrono::{DateTime, Local};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub request: RequestId,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching { request: RequestId },
    ShowingSetup,
    ShowingPunchline,
    Failed { message: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug)]
pub struct JokeController {
    category: Category,
    stage: Stage,
    current: Option<Joke>,
    next_request: u64,
    last_updated: Option<DateTime<Local>>,
}

impl JokeController {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            stage: Stage::Idle,
            current: None,
            next_request: 0,
            last_updated: None,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn current_joke(&self) -> Option<&Joke> {
        self.current.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn loading(&self) -> bool {
        matches!(self.stage, Stage::Fetching { .. })
    }

    pub fn error(&self) -> Option<&'static str> {
        match self.stage {
            Stage::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn revealed(&self) -> bool {
        self.stage == Stage::ShowingPunchline
    }

    /// Enter `Fetching` for the current category. Any earlier ticket is
    /// superseded from this point on.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.stage = Stage::Fetching { request };
        debug!(request = request.0, category = %self.category, "fetch started");

        FetchTicket {
            request,
            category: self.category,
        }
    }

    /// Apply the outcome of a fetch. Only the most recent ticket counts.
    pub fn complete_fetch(
        &mut self,
        request: RequestId,
        result: Result<Joke, JokeError>,
    ) -> Completion {
        match self.stage {
            Stage::Fetching { request: pending } if pending == request => {}
            _ => {
                debug!(request = request.0, "dropping superseded fetch result");
                return Completion::Stale;
            }
        }

        match result {
            Ok(joke) => {
                debug!(request = request.0, id = joke.id, kind = %joke.kind, "joke received");
                self.current = Some(joke);
                self.last_updated = Some(Local::now());
                self.stage = Stage::ShowingSetup;
            }
            Err(err) => {
                error!(request = request.0, category = %self.category, error = %err, "error fetching joke");
                self.stage = Stage::Failed {
                    message: FETCH_FAILED_MESSAGE,
                };
            }
        }

        Completion::Applied
    }

    pub fn reveal_punchline(&mut self) {
        if self.stage == Stage::ShowingSetup {
            self.stage = Stage::ShowingPunchline;
        }
    }

    /// Record the new category. The fetch it implies is left to the caller's
    /// category effect. Returns whether anything changed.
    pub fn select_category(&mut self, next: Category) -> bool {
        if self.category == next {
            return false;
        }
        info!(from = %self.category, to = %next, "category changed");
        self.category = next;
        true
    }

    pub fn next_joke(&mut self) -> Option<FetchTicket> {
        match self.stage {
            Stage::ShowingPunchline => Some(self.begin_fetch()),
            _ => None,
        }
    }

    pub fn retry(&mut self) -> Option<FetchTicket> {
        match self.stage {
            Stage::Failed { .. } => Some(self.begin_fetch()),
            _ => None,
        }
    }
}
