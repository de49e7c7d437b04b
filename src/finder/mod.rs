use anyhow::Result;
use std::io::Write;

use crate::config::Config;
use crate::output;
use crate::record::Recorder;
use crate::search::youtube::YoutubeApiClient;
use crate::search::VideoSearch;
use crate::select::{FallbackReason, OpenAiReasoner, Reasoner, Selection, Selector};

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Nothing survived search and filtering (or the search failed)
    NoResults,
    /// A video was chosen, shown and logged
    Selected(Selection),
}

/// Search → select → present → record, one pass per query
pub struct FinderPipeline {
    search: VideoSearch,
    selector: Selector,
    recorder: Recorder,
    model_label: String,
    show_progress: bool,
}

impl FinderPipeline {
    pub fn new(search: VideoSearch, selector: Selector, recorder: Recorder) -> Self {
        Self {
            search,
            selector,
            recorder,
            model_label: "the language model".to_string(),
            show_progress: false,
        }
    }

    /// Wire up the real YouTube and OpenAI clients
    pub fn from_config(config: &Config) -> Self {
        let platform = YoutubeApiClient::new(&config.youtube);
        let search = VideoSearch::new(Box::new(platform), &config.youtube);

        let reasoner = OpenAiReasoner::from_config(&config.llm)
            .map(|reasoner| Box::new(reasoner) as Box<dyn Reasoner>);
        if reasoner.is_none() {
            tracing::info!("Reasoning service disabled; the first video will be picked");
        }

        Self::new(
            search,
            Selector::new(reasoner),
            Recorder::new(&config.app.history_file),
        )
        .with_model_label(&config.llm.model)
    }

    pub fn with_model_label(mut self, label: &str) -> Self {
        self.model_label = label.to_string();
        self
    }

    /// Show spinners on stderr during network calls
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Run the pipeline for one query, writing the report to `out`.
    ///
    /// Search and selection failures degrade (no results, first video);
    /// only output and history-file errors are returned.
    pub async fn run<W: Write>(&self, query: &str, out: &mut W) -> Result<RunOutcome> {
        output::info(
            out,
            &format!("\n🔎 Searching {} for: \"{}\"", self.search.platform_name(), query),
        )?;
        output::info(
            out,
            &format!("🎛️ Filtering videos ({})...", self.search.describe_filter()),
        )?;

        let progress = output::spinner(self.show_progress, "Querying the video platform...");
        let searched = self.search.search(query).await;
        progress.finish_and_clear();

        let videos = match searched {
            Ok(videos) => videos,
            Err(e) => {
                tracing::warn!("Search failed: {}", e);
                output::warning(out, &format!("An error occurred while searching: {}", e))?;
                Vec::new()
            }
        };

        if videos.is_empty() {
            output::failure(out, "No matching videos found.")?;
            return Ok(RunOutcome::NoResults);
        }

        output::success(out, &format!("Found {} relevant videos.", videos.len()))?;
        if self.selector.has_reasoner() {
            let notice = format!(
                "🧠 Using {} to analyze titles and pick the best one...",
                self.model_label
            );
            output::info(out, &notice)?;
        }

        let progress = output::spinner(self.show_progress, "Waiting for the model...");
        let selection = self.selector.select(&videos, query).await;
        progress.finish_and_clear();

        let Some(selection) = selection else {
            output::present(out, None, query)?;
            return Ok(RunOutcome::NoResults);
        };

        match selection.fallback_reason() {
            None | Some(FallbackReason::Disabled) => {}
            Some(reason) => {
                let notice = format!(
                    "{}. Defaulting to first video.",
                    capitalize(&reason.to_string())
                );
                output::warning(out, &notice)?;
            }
        }

        output::present(out, Some(&selection.candidate), query)?;

        self.recorder.append(query, &selection.candidate)?;
        output::info(out, &format!("Result logged to {}", self.recorder.path().display()))?;

        Ok(RunOutcome::Selected(selection))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YoutubeConfig;
    use crate::search::{MockVideoPlatform, VideoDetails};
    use crate::select::{MockReasoner, SelectionSource};
    use crate::FinderError;
    use tempfile::TempDir;

    fn details(id: &str, duration: &str) -> VideoDetails {
        VideoDetails {
            id: id.to_string(),
            title: format!("Video {}", id),
            channel_title: "Channel".to_string(),
            published_at: "2024-05-01T10:00:00Z".to_string(),
            duration: duration.to_string(),
            view_count: Some(1500),
        }
    }

    fn platform_returning(items: Vec<VideoDetails>) -> MockVideoPlatform {
        let ids: Vec<String> = items.iter().map(|d| d.id.clone()).collect();
        let mut platform = MockVideoPlatform::new();
        platform.expect_search_ids().returning(move |_| Ok(ids.clone()));
        platform
            .expect_video_details()
            .returning(move |_| Ok(items.clone()));
        platform.expect_platform_name().return_const("YouTube");
        platform
    }

    fn pipeline(platform: MockVideoPlatform, selector: Selector, dir: &TempDir) -> FinderPipeline {
        FinderPipeline::new(
            VideoSearch::new(Box::new(platform), &YoutubeConfig::default()),
            selector,
            Recorder::new(dir.path().join("history.csv")),
        )
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("model returned"), "Model returned");
        assert_eq!(capitalize(""), "");
    }

    #[tokio::test]
    async fn test_search_failure_ends_without_record() {
        let dir = TempDir::new().unwrap();
        let mut platform = MockVideoPlatform::new();
        platform
            .expect_search_ids()
            .returning(|_| Err(FinderError::MissingCredential("YOUTUBE_API_KEY")));
        platform.expect_platform_name().return_const("YouTube");

        let finder = pipeline(platform, Selector::first_only(), &dir);
        let mut out = Vec::new();
        let outcome = finder.run("bread", &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(outcome, RunOutcome::NoResults);
        assert!(text.contains("YOUTUBE_API_KEY"));
        assert!(text.contains("No matching videos found."));
        assert!(!finder.recorder().path().exists());
    }

    #[tokio::test]
    async fn test_everything_filtered_out() {
        let dir = TempDir::new().unwrap();
        let platform = platform_returning(vec![details("short", "PT1M"), details("long", "PT1H")]);

        let finder = pipeline(platform, Selector::first_only(), &dir);
        let mut out = Vec::new();

        assert_eq!(finder.run("bread", &mut out).await.unwrap(), RunOutcome::NoResults);
        assert!(!finder.recorder().path().exists());
    }

    #[tokio::test]
    async fn test_model_choice_is_presented_and_logged() {
        let dir = TempDir::new().unwrap();
        let platform = platform_returning(vec![
            details("one", "PT5M"),
            details("two", "PT6M"),
            details("three", "PT7M"),
        ]);
        let mut reasoner = MockReasoner::new();
        reasoner.expect_complete().returning(|_, _| Ok("2".to_string()));

        let finder = pipeline(platform, Selector::new(Some(Box::new(reasoner))), &dir)
            .with_model_label("gpt-4o");
        let mut out = Vec::new();
        let outcome = finder.run("bread", &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        let RunOutcome::Selected(selection) = outcome else {
            panic!("expected a selection");
        };
        assert_eq!(selection.candidate.id, "two");
        assert_eq!(selection.source, SelectionSource::Model { index: 2 });
        assert!(text.contains("Found 3 relevant videos."));
        assert!(text.contains("Using gpt-4o"));
        assert!(text.contains("📺 Title: Video two"));
        assert!(text.contains("👁️ Views: 1,500"));

        let history = fs_err::read_to_string(finder.recorder().path()).unwrap();
        assert!(history
            .contains(",bread,two,Video two,Channel,https://www.youtube.com/watch?v=two"));
    }

    #[tokio::test]
    async fn test_out_of_range_answer_warns_and_uses_first() {
        let dir = TempDir::new().unwrap();
        let platform = platform_returning(vec![details("one", "PT5M"), details("two", "PT6M")]);
        let mut reasoner = MockReasoner::new();
        reasoner.expect_complete().returning(|_, _| Ok("99".to_string()));

        let finder = pipeline(platform, Selector::new(Some(Box::new(reasoner))), &dir);
        let mut out = Vec::new();
        let outcome = finder.run("bread", &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(matches!(outcome, RunOutcome::Selected(ref s) if s.candidate.id == "one"));
        assert!(text.contains("out-of-range index"));
        assert!(text.contains("Defaulting to first video."));
    }
}
