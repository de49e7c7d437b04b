use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{SearchRequest, VideoDetails, VideoPlatform};
use crate::config::{YoutubeConfig, YOUTUBE_API_KEY_ENV};
use crate::FinderError;

/// YouTube Data API v3 client
///
/// See https://developers.google.com/youtube/v3/docs/search/list and
/// https://developers.google.com/youtube/v3/docs/videos/list
pub struct YoutubeApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl YoutubeApiClient {
    pub fn new(config: &YoutubeConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, FinderError> {
        self.api_key
            .as_deref()
            .ok_or(FinderError::MissingCredential(YOUTUBE_API_KEY_ENV))
    }

    /// GET an endpoint and decode the JSON body, mapping API error envelopes
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FinderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key()?)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| FinderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VideoPlatform for YoutubeApiClient {
    async fn search_ids(&self, request: &SearchRequest) -> Result<Vec<String>, FinderError> {
        let max_results = request.max_results.to_string();
        let published_after = request
            .published_after
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();

        let response: SearchListResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", request.query.as_str()),
                    ("maxResults", max_results.as_str()),
                    ("type", "video"),
                    ("publishedAfter", published_after.as_str()),
                    ("order", "relevance"),
                ],
            )
            .await?;

        Ok(response.video_ids())
    }

    async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>, FinderError> {
        let joined = ids.join(",");

        let response: VideoListResponse = self
            .get_json(
                "videos",
                &[
                    ("part", "snippet,contentDetails,statistics"),
                    ("id", joined.as_str()),
                ],
            )
            .await?;

        Ok(response.into_details())
    }

    fn platform_name(&self) -> &'static str {
        "YouTube"
    }
}

fn api_error(status: u16, body: &str) -> FinderError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    FinderError::Api { status, message }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

impl SearchListResponse {
    fn video_ids(self) -> Vec<String> {
        self.items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

impl VideoListResponse {
    fn into_details(self) -> Vec<VideoDetails> {
        self.items.into_iter().map(VideoItem::into_details).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: VideoSnippet,
    #[serde(default)]
    content_details: ContentDetails,
    #[serde(default)]
    statistics: Statistics,
}

impl VideoItem {
    fn into_details(self) -> VideoDetails {
        VideoDetails {
            id: self.id,
            title: self.snippet.title,
            channel_title: self.snippet.channel_title,
            published_at: self.snippet.published_at,
            duration: self.content_details.duration,
            // The API sends counts as decimal strings
            view_count: self.statistics.view_count.and_then(|v| v.parse().ok()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoSnippet {
    title: String,
    channel_title: String,
    published_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Statistics {
    view_count: Option<String>,
}
