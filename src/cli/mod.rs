use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod input;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "video-finder",
    about = "Video Finder - Pick one recent, mid-length YouTube video for a topic",
    version,
    long_about = "Searches YouTube for videos on a topic published in the last two weeks, \
                  keeps the ones between 4 and 20 minutes long, optionally asks an OpenAI \
                  model to pick the best one, prints it and appends it to a CSV history file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// The subcommand to run; a bare invocation means `find`
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Find(FindArgs::default()))
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Search for a topic and pick the best video (default)
    Find(FindArgs),

    /// Show or initialise the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long, conflicts_with = "init")]
        show: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct FindArgs {
    /// Search query (prompted for when omitted)
    #[arg(long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Input mode (prompted for when omitted)
    #[arg(short, long, value_enum)]
    pub mode: Option<InputMode>,

    /// CSV file to append the chosen video to
    #[arg(long, value_name = "FILE")]
    pub history_file: Option<PathBuf>,

    /// Maximum number of search results to consider
    #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub max_results: Option<u32>,

    /// Skip the language model and take the first video
    #[arg(long)]
    pub no_llm: bool,
}

impl FindArgs {
    /// Fold command-line overrides into the loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.history_file {
            config.app.history_file = path.clone();
        }
        if let Some(max_results) = self.max_results {
            config.youtube.max_results = max_results;
        }
        if self.no_llm {
            config.llm.enabled = false;
        }
    }
}

/// How the query is entered. Voice is a label only; the query is still typed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Text,
    Voice,
}

impl InputMode {
    /// Interpret a typed answer; anything but "voice" means text
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().eq_ignore_ascii_case("voice") {
            InputMode::Voice
        } else {
            InputMode::Text
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputMode::Text => write!(f, "text"),
            InputMode::Voice => write!(f, "voice"),
        }
    }
}
