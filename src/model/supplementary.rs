use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scanned print edition available for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EPaperItem {
    pub id: String,
    pub title: String,
    pub upload_date: NaiveDate,
    /// URL of the uploaded PDF.
    pub file_url: String,
}

/// An entry in the video library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeVideo {
    pub id: String,
    pub title: String,
    pub url: String,
    /// At most one video in a library carries this flag.
    #[serde(default)]
    pub is_mini_player: bool,
}

/// Editable headings and button labels on the home page.
///
/// Every field falls back to its default on its own, so snapshots written
/// before a field existed still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomePageContent {
    pub latest_news_title: String,
    pub trending_title: String,
    pub editors_pick_title: String,
    pub video_section_title: String,
    pub epaper_section_title: String,
    pub read_more_label: String,
    pub view_all_label: String,
    pub subscribe_label: String,
}

impl Default for HomePageContent {
    fn default() -> Self {
        Self {
            latest_news_title: "Latest News".to_string(),
            trending_title: "Trending Now".to_string(),
            editors_pick_title: "Editor's Pick".to_string(),
            video_section_title: "Video Stories".to_string(),
            epaper_section_title: "Today's E-Paper".to_string(),
            read_more_label: "Read More".to_string(),
            view_all_label: "View All".to_string(),
            subscribe_label: "Subscribe".to_string(),
        }
    }
}

/// Breaking-news ticker shown above the masthead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakingTickerConfig {
    pub items: Vec<String>,
    /// Time for one full scroll, in milliseconds. Always positive.
    pub speed_ms: u32,
    pub pause_on_hover: bool,
}

impl BreakingTickerConfig {
    pub const DEFAULT_SPEED_MS: u32 = 22_000;
}

impl Default for BreakingTickerConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            speed_ms: Self::DEFAULT_SPEED_MS,
            pause_on_hover: true,
        }
    }
}
