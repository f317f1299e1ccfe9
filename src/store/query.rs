//! Read side of the store: what pages and editors ask for.
//!
//! Listing queries take `today` so visibility of scheduled articles is
//! decided by the caller's clock.

use chrono::NaiveDate;

use crate::model::{
    sort_newest_first, Article, BreakingTickerConfig, Category, CategorySpot, EPaperItem,
    HomePageContent, YouTubeVideo,
};

use super::content::ContentStore;
use super::{SyncState, TrackedArticle};

/// Articles for one category page, split by placement. Each list is newest
/// first.
#[derive(Debug, Default)]
pub struct CategoryPage<'a> {
    pub featured: Vec<&'a Article>,
    pub grid: Vec<&'a Article>,
    /// Visible in the category but given no slot.
    pub more: Vec<&'a Article>,
}

impl<S> ContentStore<S> {
    // ========================================================================
    // Articles
    // ========================================================================

    /// All cached articles in collection order, regardless of status.
    pub fn articles(&self) -> impl Iterator<Item = &Article> + '_ {
        self.articles.iter().map(|t| &t.article)
    }

    pub fn tracked_articles(&self) -> &[TrackedArticle] {
        &self.articles
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles().find(|a| a.id == id)
    }

    /// First article with this slug. Slugs are not unique; collection order
    /// breaks ties.
    pub fn article_by_slug(&self, slug: &str) -> Option<&Article> {
        self.articles().find(|a| a.slug == slug)
    }

    /// Articles the service has not confirmed.
    pub fn local_only_articles(&self) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|t| t.sync == SyncState::LocalOnly)
            .map(|t| &t.article)
            .collect()
    }

    /// Visible articles, newest first.
    pub fn visible_articles(&self, today: NaiveDate) -> Vec<&Article> {
        self.visible_where(today, |_| true)
    }

    pub fn articles_in_category(&self, category: Category, today: NaiveDate) -> Vec<&Article> {
        self.visible_where(today, |a| a.category == category)
    }

    pub fn category_page(&self, category: Category, today: NaiveDate) -> CategoryPage<'_> {
        let mut page = CategoryPage::default();
        for article in self.articles_in_category(category, today) {
            match article.placement.category_spot {
                CategorySpot::Featured => page.featured.push(article),
                CategorySpot::Grid => page.grid.push(article),
                CategorySpot::None => page.more.push(article),
            }
        }
        page
    }

    /// Articles for a home page section: those whose override points there,
    /// plus those without an override filed under that category.
    pub fn home_section(&self, section: Category, today: NaiveDate) -> Vec<&Article> {
        self.visible_where(today, |a| a.home_section() == section)
    }

    /// Newest visible hero-flagged article, else the newest visible one.
    pub fn hero_article(&self, today: NaiveDate) -> Option<&Article> {
        let visible = self.visible_articles(today);
        visible
            .iter()
            .find(|a| a.placement.is_hero)
            .or_else(|| visible.first())
            .copied()
    }

    /// Most viewed visible articles.
    pub fn trending(&self, limit: usize, today: NaiveDate) -> Vec<&Article> {
        let mut visible = self.visible_articles(today);
        visible.sort_by(|a, b| b.views.cmp(&a.views));
        visible.truncate(limit);
        visible
    }

    pub fn articles_with_tag(&self, tag: &str, today: NaiveDate) -> Vec<&Article> {
        self.visible_where(today, |a| a.has_tag(tag))
    }

    /// Case-insensitive match on title, summary, or any tag.
    pub fn search(&self, query: &str, today: NaiveDate) -> Vec<&Article> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.visible_where(today, |a| {
            a.title.to_lowercase().contains(&needle)
                || a.summary.to_lowercase().contains(&needle)
                || a.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
    }

    /// Other visible articles from the same category.
    pub fn related(&self, article: &Article, limit: usize, today: NaiveDate) -> Vec<&Article> {
        let mut related =
            self.visible_where(today, |a| a.category == article.category && a.id != article.id);
        related.truncate(limit);
        related
    }

    fn visible_where(&self, today: NaiveDate, keep: impl Fn(&Article) -> bool) -> Vec<&Article> {
        let mut list: Vec<&Article> = self
            .articles()
            .filter(|a| a.is_visible(today) && keep(a))
            .collect();
        sort_newest_first(&mut list);
        list
    }

    // ========================================================================
    // Supplementary
    // ========================================================================

    pub fn tags(&self) -> &[String] {
        &self.supplementary.tags
    }

    /// E-papers, newest upload first.
    pub fn epapers(&self) -> Vec<&EPaperItem> {
        let mut list: Vec<&EPaperItem> = self.supplementary.epapers.iter().collect();
        list.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        list
    }

    pub fn videos(&self) -> &[YouTubeVideo] {
        &self.supplementary.videos
    }

    pub fn mini_player_enabled(&self) -> bool {
        self.supplementary.mini_player_enabled
    }

    /// The video to float, if the mini player is on and one is selected.
    pub fn mini_player_video(&self) -> Option<&YouTubeVideo> {
        if !self.supplementary.mini_player_enabled {
            return None;
        }
        self.supplementary.videos.iter().find(|v| v.is_mini_player)
    }

    pub fn ticker(&self) -> &BreakingTickerConfig {
        &self.supplementary.ticker
    }

    pub fn home_page_content(&self) -> &HomePageContent {
        &self.supplementary.home
    }
}
