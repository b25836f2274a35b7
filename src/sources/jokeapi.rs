use super::{get_body, Joke, JokeError, JokeSource};
use crate::config::JokeApiConfig;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

pub struct JokeApiFetcher {
    config: JokeApiConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct JokeApiResponse {
    #[serde(default)]
    error: bool,
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    setup: Option<String>,
    delivery: Option<String>,
    id: Option<u64>,
}

impl JokeApiFetcher {
    pub fn new(config: JokeApiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn request_url(&self) -> String {
        format!(
            "{}/joke/{}?blacklistFlags={}&type=twopart",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.category),
            self.config.blacklist_flags.join(","),
        )
    }
}

/// Decode a JokeAPI body. The two-part fields pass through untouched.
pub fn parse_joke(body: &str) -> Result<Joke, JokeError> {
    let response: JokeApiResponse = serde_json::from_str(body)?;

    if response.error {
        return Err(JokeError::Rejected {
            message: response
                .message
                .unwrap_or_else(|| "no message".to_string()),
        });
    }

    // Single-part jokes carry `joke` instead of setup/delivery.
    match (response.setup, response.delivery, response.kind, response.id) {
        (Some(setup), Some(delivery), Some(kind), Some(id)) => Ok(Joke {
            setup,
            delivery,
            kind,
            id,
        }),
        _ => Err(JokeError::Rejected {
            message: "response was not a two-part joke".to_string(),
        }),
    }
}

#[async_trait]
impl JokeSource for JokeApiFetcher {
    fn name(&self) -> &str {
        "JokeAPI"
    }

    async fn fetch(&self) -> Result<Joke, JokeError> {
        let url = self.request_url();
        debug!(%url, "requesting two-part joke");

        let body = get_body(&self.client, &url).await?;
        parse_joke(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base_url: &str) -> JokeApiFetcher {
        let config = JokeApiConfig {
            base_url: base_url.to_string(),
            ..JokeApiConfig::default()
        };
        JokeApiFetcher::new(config, reqwest::Client::new())
    }

    #[test]
    fn test_request_url_default() {
        assert_eq!(
            fetcher("https://v2.jokeapi.dev").request_url(),
            "https://v2.jokeapi.dev/joke/Programming?blacklistFlags=nsfw,religious,political,racist,sexist,explicit&type=twopart"
        );
    }

    #[test]
    fn test_request_url_trailing_slash() {
        assert!(fetcher("http://localhost:9000/")
            .request_url()
            .starts_with("http://localhost:9000/joke/Programming?"));
    }

    #[test]
    fn test_parse_joke_passes_fields_through() {
        let body = r#"{"error":false,"category":"Programming","type":"twopart","setup":"Why do programmers prefer dark mode?","delivery":"Because light attracts bugs.","flags":{"nsfw":false},"id":1,"safe":true,"lang":"en"}"#;
        let joke = parse_joke(body).unwrap();
        assert_eq!(
            joke,
            Joke {
                setup: "Why do programmers prefer dark mode?".to_string(),
                delivery: "Because light attracts bugs.".to_string(),
                kind: "twopart".to_string(),
                id: 1,
            }
        );
    }

    #[test]
    fn test_parse_joke_keeps_whitespace() {
        let body = r#"{"type":"twopart","setup":"  padded ","delivery":"line\nbreak","id":3}"#;
        let joke = parse_joke(body).unwrap();
        assert_eq!(joke.setup, "  padded ");
        assert_eq!(joke.delivery, "line\nbreak");
    }

    #[test]
    fn test_parse_joke_provider_error() {
        let body = r#"{"error":true,"internalError":false,"code":106,"message":"No matching joke found"}"#;
        match parse_joke(body) {
            Err(JokeError::Rejected { message }) => assert_eq!(message, "No matching joke found"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_joke_single_part_rejected() {
        let body = r#"{"error":false,"type":"single","joke":"A one-liner.","id":9}"#;
        assert!(matches!(
            parse_joke(body),
            Err(JokeError::Rejected { .. })
        ));
    }

    #[test]
    fn test_parse_joke_malformed() {
        assert!(matches!(
            parse_joke("<html>oops</html>"),
            Err(JokeError::Malformed(_))
        ));
    }
}
