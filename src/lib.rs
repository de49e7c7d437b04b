//! Video Finder - A Rust CLI tool that picks one recent video for a topic
//!
//! This library searches the YouTube Data API for videos published in a trailing
//! window, keeps the ones inside a duration band, optionally asks a language model
//! to choose the best match, prints it and appends it to a CSV history file.

pub mod cli;
pub mod config;
pub mod finder;
pub mod output;
pub mod record;
pub mod search;
pub mod select;
pub mod utils;

pub use cli::{Cli, Commands, InputMode};
pub use config::Config;
pub use finder::{FinderPipeline, RunOutcome};
pub use record::Recorder;
pub use search::{VideoCandidate, VideoPlatform, VideoSearch};
pub use select::{FallbackReason, Reasoner, Selection, SelectionSource, Selector};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Recoverable failures from the external services.
///
/// Callers decide what to degrade to; none of these abort a run on their own.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    #[error("Missing credential: set {0}")]
    MissingCredential(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Reasoning service failed: {0}")]
    Reasoning(String),

    #[error("Reasoning service returned an empty response")]
    EmptyResponse,
}
