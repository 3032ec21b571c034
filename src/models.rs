use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One episode's metadata as loaded from its JSON file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEpisode {
    /// Name of the metadata file; feed items are ordered by it.
    pub file_name: String,
    /// Stable media file name used to build the enclosure URL.
    pub source_id: String,
    /// Local media file, consulted when `filesize` is missing.
    pub media_path: PathBuf,
    pub title: String,
    pub description: String,
    pub upload_date: String,
    pub duration: i64,
    pub filesize: Option<u64>,
    pub tags: Option<Vec<String>>,
}

impl RawEpisode {
    /// Tags joined with commas, or empty when the file has none.
    pub fn keywords(&self) -> String {
        self.tags.as_deref().map(|t| t.join(",")).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Explicit {
    Yes,
    #[default]
    No,
}

impl Explicit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// An episode with every field in its feed-ready form.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEpisode {
    pub file_name: String,
    pub title: String,
    pub author: String,
    pub subtitle: String,
    pub summary_html: String,
    pub image_url: String,
    pub explicit: Explicit,
    pub enclosure_url: String,
    pub content_length: u64,
    pub mime_type: String,
    pub guid: String,
    pub pub_date: String,
    pub duration: String,
    pub episode_url: String,
}
