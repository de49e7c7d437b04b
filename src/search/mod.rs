use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::ops::RangeInclusive;

pub mod youtube;

use crate::config::{YoutubeConfig, MAX_WINDOW_DAYS};
use crate::utils::parse_duration;
use crate::FinderError;

/// A keyword search constrained to a trailing publication window
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub published_after: DateTime<Utc>,
}

/// Per-video detail as returned by the batch lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub published_at: String,
    /// Raw ISO 8601 duration, e.g. `PT10M15S`
    pub duration: String,
    pub view_count: Option<u64>,
}

/// A video under consideration for selection
#[derive(Debug, Clone, PartialEq)]
pub struct VideoCandidate {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub published_at: String,
    pub duration: String,
    pub duration_seconds: u64,
    pub view_count: u64,
    pub url: String,
}

impl VideoCandidate {
    pub fn from_details(details: VideoDetails) -> Self {
        let duration_seconds = parse_duration(&details.duration);
        let url = watch_url(&details.id);

        Self {
            id: details.id,
            title: details.title,
            channel: details.channel_title,
            published_at: details.published_at,
            duration: details.duration,
            duration_seconds,
            view_count: details.view_count.unwrap_or(0),
            url,
        }
    }
}

/// Canonical watch page for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// The two calls a video platform has to answer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Keyword search, returning video ids in relevance order
    async fn search_ids(&self, request: &SearchRequest) -> Result<Vec<String>, FinderError>;

    /// Batch detail lookup for exactly the given ids
    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>, FinderError>;

    /// Get the name of this platform
    fn platform_name(&self) -> &'static str;
}

/// Search plus duration filter over an injected platform client
pub struct VideoSearch {
    platform: Box<dyn VideoPlatform>,
    max_results: u32,
    window: Duration,
    band: RangeInclusive<u64>,
}

impl VideoSearch {
    pub fn new(platform: Box<dyn VideoPlatform>, config: &YoutubeConfig) -> Self {
        Self {
            platform,
            max_results: config.max_results,
            window: Duration::days(config.window_days.clamp(0, MAX_WINDOW_DAYS)),
            band: config.min_duration_secs..=config.max_duration_secs,
        }
    }

    pub fn platform_name(&self) -> &'static str {
        self.platform.platform_name()
    }

    /// Lower publication bound for a search started at `now`
    pub fn published_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    /// Human-readable summary of the filters, e.g. "4–20 minutes, posted in last 14 days"
    pub fn describe_filter(&self) -> String {
        format!(
            "{}–{} minutes, posted in last {} days",
            self.band.start() / 60,
            self.band.end() / 60,
            self.window.num_days()
        )
    }

    /// Whether a runtime falls inside the accepted band (inclusive)
    pub fn within_band(&self, duration_seconds: u64) -> bool {
        self.band.contains(&duration_seconds)
    }

    /// Search recent videos and keep the ones inside the duration band.
    ///
    /// Relative order from the platform is preserved. An empty id list skips
    /// the detail lookup.
    pub async fn search(&self, query: &str) -> Result<Vec<VideoCandidate>, FinderError> {
        let request = SearchRequest {
            query: query.to_string(),
            max_results: self.max_results,
            published_after: self.published_after(Utc::now()),
        };

        tracing::info!(
            "Searching {} for {:?} (published after {})",
            self.platform_name(),
            request.query,
            request.published_after
        );

        let ids = self.platform.search_ids(&request).await?;
        if ids.is_empty() {
            tracing::info!("Search returned no videos");
            return Ok(Vec::new());
        }

        tracing::debug!("Looking up details for {} videos", ids.len());
        let details = self.platform.video_details(&ids).await?;

        let candidates: Vec<VideoCandidate> = details
            .into_iter()
            .map(VideoCandidate::from_details)
            .filter(|candidate| {
                let keep = self.within_band(candidate.duration_seconds);
                if !keep {
                    tracing::debug!(
                        "Dropping {} ({}s outside {:?})",
                        candidate.id,
                        candidate.duration_seconds,
                        self.band
                    );
                }
                keep
            })
            .collect();

        tracing::info!("{} videos within the duration band", candidates.len());
        Ok(candidates)
    }
}
