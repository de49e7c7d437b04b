use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::search::VideoCandidate;
use crate::utils::escape_csv_field;

/// Column names of the history file, in row order
pub const HEADER: [&str; 6] = ["timestamp", "query", "video_id", "title", "channel", "url"];

const RECORD_TERMINATOR: &str = "\r\n";

/// Appends chosen videos to a CSV history file
#[derive(Debug, Clone)]
pub struct Recorder {
    path: PathBuf,
}

impl Recorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file does not exist yet.
    ///
    /// Filesystem errors are returned to the caller.
    pub fn append(&self, query: &str, video: &VideoCandidate) -> Result<()> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.append_at(&timestamp, query, video)
    }

    fn append_at(&self, timestamp: &str, query: &str, video: &VideoCandidate) -> Result<()> {
        let write_header = !self.path.exists();

        let mut file = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open history file")?;

        let mut buffer = String::new();
        if write_header {
            buffer.push_str(&csv_row(&HEADER));
        }
        buffer.push_str(&csv_row(&[
            timestamp,
            query,
            video.id.as_str(),
            video.title.as_str(),
            video.channel.as_str(),
            video.url.as_str(),
        ]));

        file.write_all(buffer.as_bytes())
            .context("Failed to append to history file")?;

        tracing::info!("Logged {} to {}", video.id, self.path.display());
        Ok(())
    }
}

fn csv_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|field| escape_csv_field(field))
        .collect::<Vec<_>>()
        .join(",");
    row.push_str(RECORD_TERMINATOR);
    row
}
