use async_trait::async_trait;

pub mod openai;

use crate::search::VideoCandidate;
use crate::utils::{first_integer, format_duration};
use crate::FinderError;

pub use openai::OpenAiReasoner;

/// System instruction sent with every ranking request
pub const SYSTEM_PROMPT: &str =
    "You are an intelligent assistant that returns the best video number.";

/// A chat-style completion service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Send one system + user exchange and return the reply text
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, FinderError>;
}

/// Why the first candidate was picked instead of the model's answer
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FallbackReason {
    #[error("no reasoning service configured")]
    Disabled,

    #[error("reasoning service error: {0}")]
    Service(String),

    #[error("reasoning service returned an empty response")]
    EmptyResponse,

    #[error("could not find a number in the response {0:?}")]
    Unparseable(String),

    #[error("model returned an out-of-range index ({index} of {count})")]
    OutOfRange { index: u64, count: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionSource {
    /// The model's 1-based answer
    Model { index: usize },
    Fallback(FallbackReason),
}

/// The chosen candidate and how it was chosen
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub candidate: VideoCandidate,
    pub source: SelectionSource,
}

impl Selection {
    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match &self.source {
            SelectionSource::Fallback(reason) => Some(reason),
            SelectionSource::Model { .. } => None,
        }
    }
}

/// Picks one candidate, asking the reasoning service when one is available
pub struct Selector {
    reasoner: Option<Box<dyn Reasoner>>,
}

impl Selector {
    pub fn new(reasoner: Option<Box<dyn Reasoner>>) -> Self {
        Self { reasoner }
    }

    /// Selector that always takes the first candidate
    pub fn first_only() -> Self {
        Self::new(None)
    }

    pub fn has_reasoner(&self) -> bool {
        self.reasoner.is_some()
    }

    /// Choose one candidate. Returns `None` only for an empty input.
    ///
    /// Service failures never escape: they turn into a fallback to the first
    /// candidate, tagged with the reason.
    pub async fn select(&self, candidates: &[VideoCandidate], query: &str) -> Option<Selection> {
        let first = candidates.first()?;

        let outcome = match &self.reasoner {
            None => Err(FallbackReason::Disabled),
            Some(reasoner) => {
                let prompt = build_prompt(candidates, query);
                tracing::debug!("Ranking prompt:\n{}", prompt);

                match reasoner.complete(SYSTEM_PROMPT, &prompt).await {
                    Ok(reply) => interpret_reply(&reply, candidates.len()),
                    Err(FinderError::EmptyResponse) => Err(FallbackReason::EmptyResponse),
                    Err(e) => Err(FallbackReason::Service(e.to_string())),
                }
            }
        };

        let selection = match outcome {
            Ok(index) => Selection {
                candidate: candidates[index - 1].clone(),
                source: SelectionSource::Model { index },
            },
            Err(reason) => {
                if reason != FallbackReason::Disabled {
                    tracing::warn!("Falling back to the first video: {}", reason);
                }
                Selection {
                    candidate: first.clone(),
                    source: SelectionSource::Fallback(reason),
                }
            }
        };

        Some(selection)
    }
}

/// Numbered listing of candidates, one per line
pub fn candidate_listing(candidates: &[VideoCandidate]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, video)| {
            format!(
                "{}. Title: '{}' by {} ({})",
                i + 1,
                video.title,
                video.channel,
                format_duration(video.duration_seconds)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(candidates: &[VideoCandidate], query: &str) -> String {
    format!(
        "You are an intelligent assistant. Given the following YouTube video search results \
for the query \"{query}\", select the best video based on:

1. Relevance to the query
2. Title clarity and informativeness (not clickbait)
3. Likely educational value

Here are the videos:
{listing}

Return only the number (like 1 or 2 or 3) of the best video. Do not return anything else.",
        query = query,
        listing = candidate_listing(candidates),
    )
}

/// Read a 1-based index out of the model's reply and check it against `count`
pub fn interpret_reply(reply: &str, count: usize) -> Result<usize, FallbackReason> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(FallbackReason::EmptyResponse);
    }

    let digits = first_integer(trimmed)
        .ok_or_else(|| FallbackReason::Unparseable(trimmed.to_string()))?;

    // Too many digits for u64 is out of range as well
    let index: u64 = digits.parse().unwrap_or(u64::MAX);

    match usize::try_from(index) {
        Ok(i) if (1..=count).contains(&i) => Ok(i),
        _ => Err(FallbackReason::OutOfRange { index, count }),
    }
}
