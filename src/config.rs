use crate::sources::Category;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".jokebooth";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "jokebooth.log";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    pub default_category: Category,
    pub log_file: Option<PathBuf>,
    pub tick_rate_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "CODE CARNIVAL".to_string(),
            default_category: Category::Programming,
            log_file: None,
            tick_rate_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub timeout_secs: Option<u64>,
    pub programming: JokeApiConfig,
    pub random: OfficialJokeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JokeApiConfig {
    pub base_url: String,
    pub category: String,
    pub blacklist_flags: Vec<String>,
}

impl Default for JokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v2.jokeapi.dev".to_string(),
            category: "Programming".to_string(),
            blacklist_flags: ["nsfw", "religious", "political", "racist", "sexist", "explicit"]
                .iter()
                .map(|flag| flag.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficialJokeConfig {
    pub url: String,
}

impl Default for OfficialJokeConfig {
    fn default() -> Self {
        Self {
            url: "https://official-joke-api.appspot.com/random_joke".to_string(),
        }
    }
}

impl Config {
    /// `~/.jokebooth/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("failed to write config file {}", path.display()))
    }

    /// Where diagnostics go while the TUI owns the terminal.
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.general.log_file {
            Some(path) => Ok(expand_home(path)),
            None => {
                let home = dirs::home_dir().context("could not determine home directory")?;
                Ok(home.join(CONFIG_DIR).join(LOG_FILE))
            }
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
