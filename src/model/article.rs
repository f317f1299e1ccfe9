use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::util::{estimate_read_time, slugify};

/// Image shown when an article has no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

// ============================================================================
// Category
// ============================================================================

/// The fixed set of sections articles are filed under.
///
/// Serialized as the lowercase slug, which is also the `category` query
/// parameter used by category pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    National,
    International,
    Politics,
    Business,
    Sports,
    Entertainment,
    Technology,
    Health,
    Opinion,
    Lifestyle,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::National,
        Category::International,
        Category::Politics,
        Category::Business,
        Category::Sports,
        Category::Entertainment,
        Category::Technology,
        Category::Health,
        Category::Opinion,
        Category::Lifestyle,
    ];

    /// Display name as shown in navigation and returned by the content API.
    pub fn name(self) -> &'static str {
        match self {
            Category::National => "National",
            Category::International => "International",
            Category::Politics => "Politics",
            Category::Business => "Business",
            Category::Sports => "Sports",
            Category::Entertainment => "Entertainment",
            Category::Technology => "Technology",
            Category::Health => "Health",
            Category::Opinion => "Opinion",
            Category::Lifestyle => "Lifestyle",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Category::National => "national",
            Category::International => "international",
            Category::Politics => "politics",
            Category::Business => "business",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::Technology => "technology",
            Category::Health => "health",
            Category::Opinion => "opinion",
            Category::Lifestyle => "lifestyle",
        }
    }

    /// Case-insensitive lookup by display name or slug.
    pub fn from_name(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name) || c.slug().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_name(s).ok_or_else(|| format!("unknown category: {s}"))
    }
}

// ============================================================================
// Status and placement
// ============================================================================

/// Editorial lifecycle of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Scheduled,
    #[default]
    Published,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Scheduled => "scheduled",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ArticleStatus::Draft),
            "scheduled" => Ok(ArticleStatus::Scheduled),
            "published" => Ok(ArticleStatus::Published),
            "archived" => Ok(ArticleStatus::Archived),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot an article occupies on its category page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySpot {
    Featured,
    Grid,
    #[default]
    None,
}

/// Where an article is shown outside the plain listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placement {
    /// Candidate for the home page hero slot.
    pub is_hero: bool,
    /// Home page section override; `None` means the article's own category.
    pub home_section: Option<Category>,
    pub category_spot: CategorySpot,
}

// ============================================================================
// Article
// ============================================================================

/// A news article as held by the content store.
///
/// The serialized form (camelCase) is what the offline fallback snapshot
/// stores; the content API uses its own wire shape, see `remote::wire`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// HTML body.
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_image")]
    pub image: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: String,
    pub publish_date: NaiveDate,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub placement: Placement,
}

fn default_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

impl Article {
    /// Start a new draft with a client-side identifier.
    ///
    /// The identifier is replaced by the server's once the draft is created
    /// remotely; it only survives if creation fails.
    pub fn draft(title: &str, category: Category, author: &str, publish_date: NaiveDate) -> Self {
        Self {
            id: local_id(),
            title: title.to_string(),
            summary: String::new(),
            content: String::new(),
            image: default_image(),
            category,
            tags: Vec::new(),
            author: author.to_string(),
            publish_date,
            read_time: None,
            views: 0,
            status: ArticleStatus::Draft,
            slug: slugify(title),
            placement: Placement::default(),
        }
    }

    /// Replace the title and re-derive the slug from it.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.slug = slugify(title);
    }

    /// Replace the body and refresh the read-time estimate.
    pub fn set_content(&mut self, html: &str) {
        self.content = html.to_string();
        self.read_time = Some(estimate_read_time(html));
    }

    /// Add a tag unless an equal one (ignoring case) is already present.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return;
        }
        self.tags.push(tag.to_string());
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Published, or scheduled for a date that has arrived.
    pub fn is_visible(&self, today: NaiveDate) -> bool {
        match self.status {
            ArticleStatus::Published => true,
            ArticleStatus::Scheduled => self.publish_date <= today,
            ArticleStatus::Draft | ArticleStatus::Archived => false,
        }
    }

    /// Home section this article appears under.
    pub fn home_section(&self) -> Category {
        self.placement.home_section.unwrap_or(self.category)
    }
}

/// Drop empty and case-insensitively repeated tags, keeping first spellings.
pub fn dedup_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Sort newest first. Stable, so equal dates keep their relative order.
pub fn sort_newest_first(articles: &mut [&Article]) {
    articles.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
}

static LAST_LOCAL_ID: AtomicI64 = AtomicI64::new(0);

/// Client-side identifier for records created without the server.
///
/// Millisecond timestamp, bumped when two ids are minted within the same
/// millisecond so they stay unique within the process.
pub fn local_id() -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_LOCAL_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_LOCAL_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return format!("local-{next}"),
            Err(actual) => last = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_category_lookup_by_name_or_slug() {
        assert_eq!(Category::from_name("Health"), Some(Category::Health));
        assert_eq!(Category::from_name("health"), Some(Category::Health));
        assert_eq!(Category::from_name(" SPORTS "), Some(Category::Sports));
        assert_eq!(Category::from_name("Weather"), None);
    }

    #[test]
    fn test_category_serializes_as_slug() {
        let json = serde_json::to_string(&Category::International).unwrap();
        assert_eq!(json, "\"international\"");
    }

    #[test]
    fn test_visibility_rules() {
        let today = date(2025, 3, 10);
        let mut a = Article::draft("T", Category::National, "A", date(2025, 3, 10));
        assert!(!a.is_visible(today));

        a.status = ArticleStatus::Published;
        assert!(a.is_visible(today));

        a.status = ArticleStatus::Scheduled;
        assert!(a.is_visible(today)); // same day counts
        a.publish_date = date(2025, 3, 11);
        assert!(!a.is_visible(today));

        a.status = ArticleStatus::Archived;
        a.publish_date = date(2020, 1, 1);
        assert!(!a.is_visible(today));
    }

    #[test]
    fn test_draft_has_local_id_and_slug() {
        let a = Article::draft("Hello, World", Category::Business, "Desk", date(2025, 1, 1));
        assert!(a.id.starts_with("local-"));
        assert_eq!(a.slug, "hello-world");
        assert_eq!(a.status, ArticleStatus::Draft);
        assert_eq!(a.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_local_ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..50).map(|_| local_id()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_set_title_rederives_slug() {
        let mut a = Article::draft("Old", Category::Business, "Desk", date(2025, 1, 1));
        a.set_title("Brand New Title");
        assert_eq!(a.slug, "brand-new-title");
    }

    #[test]
    fn test_tags_unique_within_article() {
        let mut a = Article::draft("T", Category::Business, "Desk", date(2025, 1, 1));
        a.add_tag("Economy");
        a.add_tag("economy");
        a.add_tag("  ");
        a.add_tag("Markets");
        assert_eq!(a.tags, vec!["Economy", "Markets"]);
    }

    #[test]
    fn test_dedup_tags() {
        let tags = dedup_tags(vec!["a".into(), "A".into(), "".into(), "b".into()]);
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_sort_is_stable_newest_first() {
        let mut x = Article::draft("x", Category::National, "", date(2025, 1, 1));
        x.id = "x".into();
        let mut y = Article::draft("y", Category::National, "", date(2025, 1, 2));
        y.id = "y".into();
        let mut z = Article::draft("z", Category::National, "", date(2025, 1, 1));
        z.id = "z".into();

        let mut list = vec![&x, &y, &z];
        sort_newest_first(&mut list);
        let ids: Vec<_> = list.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["y", "x", "z"]);
    }

    #[test]
    fn test_missing_optional_fields_default_on_deserialize() {
        let json = r#"{"id":"1","title":"T","category":"health","publishDate":"2025-02-01"}"#;
        let a: Article = serde_json::from_str(json).unwrap();
        assert_eq!(a.status, ArticleStatus::Published);
        assert_eq!(a.image, PLACEHOLDER_IMAGE);
        assert_eq!(a.placement, Placement::default());
        assert!(a.read_time.is_none());
    }
}
