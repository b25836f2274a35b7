pub mod jokeapi;
pub mod official;

use crate::config::SourcesConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use self::jokeapi::JokeApiFetcher;
use self::official::OfficialJokeFetcher;

/// Shown to the user for every kind of fetch failure.
pub const FETCH_FAILED_MESSAGE: &str = "Oops! The joke machine is broken. Try again!";

const USER_AGENT: &str = concat!("jokebooth/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub setup: String,
    pub delivery: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Programming,
    Any,
}

impl Category {
    pub fn toggled(self) -> Self {
        match self {
            Category::Programming => Category::Any,
            Category::Any => Category::Programming,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Category::Programming => "PROGRAMMING JOKE",
            Category::Any => "RANDOM JOKE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Programming => f.write_str("programming"),
            Category::Any => f.write_str("any"),
        }
    }
}

#[derive(Debug, Error)]
pub enum JokeError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("joke source answered with HTTP {status}")]
    Response { status: reqwest::StatusCode },
    #[error("unexpected joke payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("joke source reported an error: {message}")]
    Rejected { message: String },
}

/// Produces one normalized joke per call.
#[async_trait]
pub trait JokeSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Joke, JokeError>;
}

/// Builds the source that serves `category`.
pub fn source_for(category: Category, config: &SourcesConfig) -> Box<dyn JokeSource> {
    let client = build_client(config.timeout_secs);
    match category {
        Category::Programming => Box::new(JokeApiFetcher::new(config.programming.clone(), client)),
        Category::Any => Box::new(OfficialJokeFetcher::new(config.random.url.clone(), client)),
    }
}

fn build_client(timeout_secs: Option<u64>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Sends a GET and hands back the body of a successful response.
async fn get_body(client: &reqwest::Client, url: &str) -> Result<String, JokeError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(JokeError::Response {
            status: response.status(),
        });
    }

    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_toggle() {
        assert_eq!(Category::Programming.toggled(), Category::Any);
        assert_eq!(Category::Any.toggled(), Category::Programming);
    }

    #[test]
    fn test_category_display_matches_serde() {
        for category in [Category::Programming, Category::Any] {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }

    #[test]
    fn test_joke_serializes_kind_as_type() {
        let joke = Joke {
            setup: "s".to_string(),
            delivery: "d".to_string(),
            kind: "random".to_string(),
            id: 7,
        };
        let value = serde_json::to_value(&joke).unwrap();
        assert_eq!(value["type"], "random");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_source_for_picks_provider() {
        let config = SourcesConfig::default();
        assert_eq!(source_for(Category::Programming, &config).name(), "JokeAPI");
        assert_eq!(source_for(Category::Any, &config).name(), "Official Joke API");
    }
}
