use serde::{Deserialize, Serialize};

use crate::model::{Article, BreakingTickerConfig, EPaperItem, HomePageContent, YouTubeVideo};

use super::seed;

/// Client-owned state: everything the store keeps that the content service
/// does not.
#[derive(Debug, Clone, PartialEq)]
pub struct Supplementary {
    pub tags: Vec<String>,
    pub epapers: Vec<EPaperItem>,
    pub videos: Vec<YouTubeVideo>,
    pub mini_player_enabled: bool,
    pub ticker: BreakingTickerConfig,
    pub home: HomePageContent,
}

/// The persisted record, as stored under the store's key.
///
/// Fields missing from an older record take their seed value. `articles` is
/// only present when an offline fallback has been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<Article>>,
    pub tags: Vec<String>,
    pub epapers: Vec<EPaperItem>,
    pub youtube_videos: Vec<YouTubeVideo>,
    pub mini_player_enabled: bool,
    pub breaking_items: Vec<String>,
    pub breaking_speed_ms: u32,
    pub breaking_pause_on_hover: bool,
    pub home_page_content: HomePageContent,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot::capture(&seed::supplementary(), None)
    }
}

/// Borrowed form written on every supplementary change, so persisting does
/// not clone the collections.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnapshotView<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles: Option<&'a [Article]>,
    pub tags: &'a [String],
    pub epapers: &'a [EPaperItem],
    pub youtube_videos: &'a [YouTubeVideo],
    pub mini_player_enabled: bool,
    pub breaking_items: &'a [String],
    pub breaking_speed_ms: u32,
    pub breaking_pause_on_hover: bool,
    pub home_page_content: &'a HomePageContent,
}

impl<'a> SnapshotView<'a> {
    pub fn new(state: &'a Supplementary, articles: Option<&'a [Article]>) -> Self {
        Self {
            articles,
            tags: &state.tags,
            epapers: &state.epapers,
            youtube_videos: &state.videos,
            mini_player_enabled: state.mini_player_enabled,
            breaking_items: &state.ticker.items,
            breaking_speed_ms: state.ticker.speed_ms,
            breaking_pause_on_hover: state.ticker.pause_on_hover,
            home_page_content: &state.home,
        }
    }
}

impl Snapshot {
    pub fn capture(state: &Supplementary, articles: Option<Vec<Article>>) -> Self {
        Self {
            articles,
            tags: state.tags.clone(),
            epapers: state.epapers.clone(),
            youtube_videos: state.videos.clone(),
            mini_player_enabled: state.mini_player_enabled,
            breaking_items: state.ticker.items.clone(),
            breaking_speed_ms: state.ticker.speed_ms,
            breaking_pause_on_hover: state.ticker.pause_on_hover,
            home_page_content: state.home.clone(),
        }
    }

    /// Split into the fallback articles and the supplementary state,
    /// repairing values a hand-edited or older record may carry: a zero
    /// ticker speed and more than one mini-player video.
    pub fn into_parts(self) -> (Option<Vec<Article>>, Supplementary) {
        let speed_ms = if self.breaking_speed_ms == 0 {
            tracing::warn!("Persisted ticker speed is zero, using default");
            BreakingTickerConfig::DEFAULT_SPEED_MS
        } else {
            self.breaking_speed_ms
        };

        let mut videos = self.youtube_videos;
        let mut seen_flag = false;
        for video in &mut videos {
            if video.is_mini_player {
                if seen_flag {
                    tracing::warn!(id = %video.id, "Dropping extra mini-player flag from snapshot");
                    video.is_mini_player = false;
                }
                seen_flag = true;
            }
        }

        let state = Supplementary {
            tags: self.tags,
            epapers: self.epapers,
            videos,
            mini_player_enabled: self.mini_player_enabled,
            ticker: BreakingTickerConfig {
                items: self.breaking_items,
                speed_ms,
                pause_on_hover: self.breaking_pause_on_hover,
            },
            home: self.home_page_content,
        };
        (self.articles, state)
    }
}
