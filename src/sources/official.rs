use super::{get_body, Joke, JokeError, JokeSource};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Type tag given to every joke from this source; the API has no type of its own.
pub const RANDOM_KIND: &str = "random";

pub struct OfficialJokeFetcher {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RandomJoke {
    setup: String,
    punchline: String,
    id: u64,
}

impl OfficialJokeFetcher {
    pub fn new(url: String, client: reqwest::Client) -> Self {
        Self { url, client }
    }
}

/// Decode an Official Joke API body, moving `punchline` into `delivery`.
pub fn parse_joke(body: &str) -> Result<Joke, JokeError> {
    let joke: RandomJoke = serde_json::from_str(body)?;

    Ok(Joke {
        setup: joke.setup,
        delivery: joke.punchline,
        kind: RANDOM_KIND.to_string(),
        id: joke.id,
    })
}

#[async_trait]
impl JokeSource for OfficialJokeFetcher {
    fn name(&self) -> &str {
        "Official Joke API"
    }

    async fn fetch(&self) -> Result<Joke, JokeError> {
        debug!(url = %self.url, "requesting random joke");

        let body = get_body(&self.client, &self.url).await?;
        parse_joke(&body)
    }
}
