use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the YouTube Data API key
pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Upper bound the YouTube search endpoint accepts for `maxResults`
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// Longest accepted publication window, in days
pub const MAX_WINDOW_DAYS: i64 = 3650;

const LOCAL_CONFIG_FILE: &str = "video-finder.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// YouTube search settings
    pub youtube: YoutubeConfig,

    /// Reasoning service settings
    pub llm: LlmConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YoutubeConfig {
    /// Base URL of the YouTube Data API v3
    pub api_base_url: String,

    /// Developer key, read from the environment only
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Maximum number of search results requested
    pub max_results: u32,

    /// Only videos published within this many days are considered
    pub window_days: i64,

    /// Shortest accepted runtime in seconds (inclusive)
    pub min_duration_secs: u64,

    /// Longest accepted runtime in seconds (inclusive)
    pub max_duration_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    /// Ask the model to pick the best video
    pub enabled: bool,

    /// API key, read from the environment only
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Chat model name
    pub model: String,

    /// Output token ceiling, enough for a short number
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// CSV file the chosen videos are appended to
    pub history_file: PathBuf,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            max_results: 20,
            window_days: 14,
            min_duration_secs: 240,
            max_duration_secs: 1200,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: "gpt-4o".to_string(),
            max_tokens: 5,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from("search_history.csv"),
        }
    }
}

impl Config {
    /// Load configuration from file (or defaults) and pick up credentials
    pub async fn load() -> Result<Self> {
        let mut config = match Self::existing_config_path() {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                let content = fs_err::read_to_string(&path)
                    .context("Failed to read config file")?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Read credentials from the process environment
    pub fn apply_env(&mut self) {
        self.youtube.api_key = non_empty_env(YOUTUBE_API_KEY_ENV);
        self.llm.api_key = non_empty_env(OPENAI_API_KEY_ENV);
    }

    /// Write the default configuration file and return its path
    pub async fn save_default() -> Result<PathBuf> {
        let config_path = Self::user_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(&Self::default())
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    fn existing_config_path() -> Option<PathBuf> {
        // Current directory first for easy testing
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        Self::user_config_path().ok().filter(|path| path.exists())
    }

    fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("video-finder").join("config.yaml"))
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.youtube.max_results) {
            anyhow::bail!(
                "youtube.max_results must be between 1 and {}, got {}",
                MAX_RESULTS_LIMIT,
                self.youtube.max_results
            );
        }

        if self.youtube.min_duration_secs > self.youtube.max_duration_secs {
            anyhow::bail!(
                "youtube.min_duration_secs ({}) exceeds youtube.max_duration_secs ({})",
                self.youtube.min_duration_secs,
                self.youtube.max_duration_secs
            );
        }

        if !(0..=MAX_WINDOW_DAYS).contains(&self.youtube.window_days) {
            anyhow::bail!(
                "youtube.window_days must be between 0 and {}, got {}",
                MAX_WINDOW_DAYS,
                self.youtube.window_days
            );
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        let set_or_unset = |key: &Option<String>| {
            if key.is_some() {
                "set"
            } else {
                "not set"
            }
        };

        println!("Current Configuration:");
        println!("  YouTube API: {}", self.youtube.api_base_url);
        println!("  {}: {}", YOUTUBE_API_KEY_ENV, set_or_unset(&self.youtube.api_key));
        println!("  Max Results: {}", self.youtube.max_results);
        println!("  Window: last {} days", self.youtube.window_days);
        println!(
            "  Duration Band: {}s - {}s",
            self.youtube.min_duration_secs, self.youtube.max_duration_secs
        );
        println!("  LLM Enabled: {}", self.llm.enabled);
        println!("  LLM Model: {}", self.llm.model);
        println!("  {}: {}", OPENAI_API_KEY_ENV, set_or_unset(&self.llm.api_key));
        println!("  History File: {}", self.app.history_file.display());
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
