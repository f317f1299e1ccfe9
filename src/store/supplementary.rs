//! Edits to client-owned state. None of these touch the content service;
//! each one updates memory and then writes the snapshot.

use crate::model::{local_id, EPaperItem, HomePageContent, YouTubeVideo};
use crate::storage::LocalStorage;

use super::content::ContentStore;
use super::{StoreError, StoreEvent};

fn non_empty(value: &str, what: &'static str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StoreError::EmptyValue(what))
    } else {
        Ok(trimmed.to_string())
    }
}

impl<S: LocalStorage> ContentStore<S> {
    async fn commit(&mut self) {
        self.persist().await;
        self.notify(StoreEvent::SupplementaryChanged);
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Add a tag to the shared vocabulary.
    ///
    /// Returns `false` when an equal tag (ignoring case) already exists.
    pub async fn add_tag(&mut self, tag: &str) -> Result<bool, StoreError> {
        let tag = non_empty(tag, "Tag")?;
        if self
            .supplementary
            .tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&tag))
        {
            return Ok(false);
        }
        self.supplementary.tags.push(tag);
        self.commit().await;
        Ok(true)
    }

    /// Remove a tag (case-insensitive). Returns whether one was removed.
    ///
    /// Articles keep the tag; the vocabulary only drives the editor.
    pub async fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.supplementary.tags.len();
        self.supplementary
            .tags
            .retain(|t| !t.eq_ignore_ascii_case(tag.trim()));
        let removed = self.supplementary.tags.len() != before;
        if removed {
            self.commit().await;
        }
        removed
    }

    // ========================================================================
    // E-papers
    // ========================================================================

    /// Add an uploaded edition. An empty id is replaced with a local one.
    pub async fn add_epaper(&mut self, mut item: EPaperItem) -> Result<EPaperItem, StoreError> {
        item.title = non_empty(&item.title, "E-paper title")?;
        item.file_url = non_empty(&item.file_url, "E-paper file")?;
        if item.id.trim().is_empty() {
            item.id = local_id();
        }
        self.supplementary.epapers.push(item.clone());
        self.commit().await;
        Ok(item)
    }

    pub async fn delete_epaper(&mut self, id: &str) -> Result<EPaperItem, StoreError> {
        let pos = self
            .supplementary
            .epapers
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::UnknownEPaper(id.to_string()))?;
        let removed = self.supplementary.epapers.remove(pos);
        self.commit().await;
        Ok(removed)
    }

    // ========================================================================
    // Videos
    // ========================================================================

    /// Add a video. If it arrives flagged for the mini player, every other
    /// video loses the flag.
    pub async fn add_video(&mut self, mut video: YouTubeVideo) -> Result<YouTubeVideo, StoreError> {
        video.title = non_empty(&video.title, "Video title")?;
        video.url = non_empty(&video.url, "Video URL")?;
        if video.id.trim().is_empty() {
            video.id = local_id();
        }
        if video.is_mini_player {
            self.clear_mini_player_flags();
        }
        self.supplementary.videos.push(video.clone());
        self.commit().await;
        Ok(video)
    }

    /// Replace a video by id, keeping the single mini-player invariant.
    pub async fn update_video(&mut self, video: YouTubeVideo) -> Result<(), StoreError> {
        let pos = self
            .supplementary
            .videos
            .iter()
            .position(|v| v.id == video.id)
            .ok_or_else(|| StoreError::UnknownVideo(video.id.clone()))?;
        if video.is_mini_player {
            self.clear_mini_player_flags();
        }
        self.supplementary.videos[pos] = video;
        self.commit().await;
        Ok(())
    }

    pub async fn delete_video(&mut self, id: &str) -> Result<YouTubeVideo, StoreError> {
        let pos = self
            .supplementary
            .videos
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| StoreError::UnknownVideo(id.to_string()))?;
        let removed = self.supplementary.videos.remove(pos);
        self.commit().await;
        Ok(removed)
    }

    /// Make `id` the one mini-player video, clearing the flag elsewhere.
    pub async fn set_mini_player_video(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.supplementary.videos.iter().any(|v| v.id == id) {
            return Err(StoreError::UnknownVideo(id.to_string()));
        }
        for video in &mut self.supplementary.videos {
            video.is_mini_player = video.id == id;
        }
        self.commit().await;
        Ok(())
    }

    /// Leave no video selected for the mini player.
    pub async fn clear_mini_player_video(&mut self) {
        self.clear_mini_player_flags();
        self.commit().await;
    }

    /// Turn the floating mini player on or off site-wide.
    pub async fn set_mini_player_enabled(&mut self, enabled: bool) {
        self.supplementary.mini_player_enabled = enabled;
        self.commit().await;
    }

    fn clear_mini_player_flags(&mut self) {
        for video in &mut self.supplementary.videos {
            video.is_mini_player = false;
        }
    }

    // ========================================================================
    // Breaking ticker
    // ========================================================================

    pub async fn add_breaking_item(&mut self, text: &str) -> Result<(), StoreError> {
        let text = non_empty(text, "Ticker item")?;
        self.supplementary.ticker.items.push(text);
        self.commit().await;
        Ok(())
    }

    pub async fn update_breaking_item(&mut self, index: usize, text: &str) -> Result<(), StoreError> {
        let text = non_empty(text, "Ticker item")?;
        let len = self.supplementary.ticker.items.len();
        let slot = self
            .supplementary
            .ticker
            .items
            .get_mut(index)
            .ok_or(StoreError::TickerIndexOutOfRange { index, len })?;
        *slot = text;
        self.commit().await;
        Ok(())
    }

    pub async fn remove_breaking_item(&mut self, index: usize) -> Result<String, StoreError> {
        let len = self.supplementary.ticker.items.len();
        if index >= len {
            return Err(StoreError::TickerIndexOutOfRange { index, len });
        }
        let removed = self.supplementary.ticker.items.remove(index);
        self.commit().await;
        Ok(removed)
    }

    /// Move an item so it ends up at position `to`.
    pub async fn move_breaking_item(&mut self, from: usize, to: usize) -> Result<(), StoreError> {
        let len = self.supplementary.ticker.items.len();
        if from >= len {
            return Err(StoreError::TickerIndexOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(StoreError::TickerIndexOutOfRange { index: to, len });
        }
        let item = self.supplementary.ticker.items.remove(from);
        self.supplementary.ticker.items.insert(to, item);
        self.commit().await;
        Ok(())
    }

    /// Replace all items. Blank entries are dropped.
    pub async fn set_breaking_items(&mut self, items: Vec<String>) {
        self.supplementary.ticker.items = items
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        self.commit().await;
    }

    /// Milliseconds per full scroll. Zero is rejected.
    pub async fn set_breaking_speed(&mut self, speed_ms: u32) -> Result<(), StoreError> {
        if speed_ms == 0 {
            return Err(StoreError::InvalidTickerSpeed);
        }
        self.supplementary.ticker.speed_ms = speed_ms;
        self.commit().await;
        Ok(())
    }

    pub async fn set_breaking_pause_on_hover(&mut self, pause: bool) {
        self.supplementary.ticker.pause_on_hover = pause;
        self.commit().await;
    }

    // ========================================================================
    // Home page
    // ========================================================================

    pub async fn set_home_page_content(&mut self, content: HomePageContent) {
        self.supplementary.home = content;
        self.commit().await;
    }
}
