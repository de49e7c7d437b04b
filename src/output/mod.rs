use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::search::VideoCandidate;
use crate::utils::{date_portion, format_duration, format_thousands};

const RULE_WIDTH: usize = 60;

/// Print the selected video, or a "no results" notice when there is none
pub fn present<W: Write>(
    out: &mut W,
    video: Option<&VideoCandidate>,
    query: &str,
) -> io::Result<()> {
    let Some(video) = video else {
        writeln!(out, "\n😞 No matching videos found.")?;
        return Ok(());
    };

    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "\n{}", rule)?;
    writeln!(out, "🔍 Search Query: \"{}\"", query)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "🏆 BEST MATCH:")?;
    writeln!(out, "📺 Title: {}", video.title)?;
    writeln!(out, "👤 Channel: {}", video.channel)?;
    writeln!(out, "⏱️ Duration: {}", format_duration(video.duration_seconds))?;
    writeln!(out, "📅 Published: {}", date_portion(&video.published_at))?;
    writeln!(out, "👁️ Views: {}", format_thousands(video.view_count))?;
    writeln!(out, "🔗 URL: {}", video.url)?;
    writeln!(out, "{}", rule)?;

    Ok(())
}

/// Program banner
pub fn banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", style("🎯 YouTube Video Finder").bold())?;
    writeln!(out, "------------------------")
}

pub fn info<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{}", msg)
}

pub fn success<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("✅").green(), msg)
}

/// Operator-facing diagnostic for a degraded step
pub fn warning<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("⚠️").yellow(), style(msg).yellow())
}

pub fn failure<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("❌").red(), msg)
}

/// Spinner on stderr for a network call; hidden when progress is disabled
pub fn spinner(enabled: bool, msg: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress.set_style(template);
    }
    progress.set_message(msg.to_string());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video() -> VideoCandidate {
        VideoCandidate {
            id: "abc123".to_string(),
            title: "Sourdough basics".to_string(),
            channel: "Bread Lab".to_string(),
            published_at: "2024-05-01T10:20:30Z".to_string(),
            duration: "PT10M15S".to_string(),
            duration_seconds: 615,
            view_count: 1234567,
            url: "https://www.youtube.com/watch?v=abc123".to_string(),
        }
    }

    fn render(video: Option<&VideoCandidate>) -> String {
        let mut out = Vec::new();
        present(&mut out, video, "how to bake bread").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_present_selected_video() {
        let text = render(Some(&video()));

        assert!(text.contains("🔍 Search Query: \"how to bake bread\""));
        assert!(text.contains("📺 Title: Sourdough basics"));
        assert!(text.contains("👤 Channel: Bread Lab"));
        assert!(text.contains("⏱️ Duration: 10:15"));
        assert!(text.contains("📅 Published: 2024-05-01\n"));
        assert!(text.contains("👁️ Views: 1,234,567"));
        assert!(text.contains("🔗 URL: https://www.youtube.com/watch?v=abc123"));
        assert_eq!(text.matches(&"=".repeat(RULE_WIDTH)).count(), 3);
    }

    #[test]
    fn test_present_nothing() {
        let text = render(None);
        assert_eq!(text, "\n😞 No matching videos found.\n");
    }

    #[test]
    fn test_hidden_spinner() {
        let progress = spinner(false, "Searching...");
        assert!(progress.is_hidden());
        progress.finish_and_clear();
    }
}
