//! JSON shapes exchanged with the content API and their mapping onto
//! [`Article`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::model::{dedup_tags, Article, ArticleStatus, Category, Placement, PLACEHOLDER_IMAGE};
use crate::util::{estimate_read_time, slugify};

/// Byline used when the service does not name an author.
pub const DEFAULT_AUTHOR: &str = "Staff Reporter";

/// Identifier as sent by the service: some deployments use integers, some
/// strings. Both normalize to the string form used locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteId::Number(n) => write!(f, "{n}"),
            RemoteId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTag {
    #[serde(default)]
    pub id: Option<RemoteId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Article record as returned by `GET /articles` and the write endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteArticle {
    pub id: RemoteId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<RemoteId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<RemoteTag>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub views: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticlesEnvelope {
    #[serde(default)]
    pub articles: Vec<RemoteArticle>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticleEnvelope {
    pub article: RemoteArticle,
}

/// `{id, name}` pair from `/categories` or `/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRecord {
    pub id: RemoteId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Vec<NamedRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsEnvelope {
    #[serde(default)]
    pub tags: Vec<NamedRecord>,
}

/// Request body for `POST /articles` and `PUT /articles/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBody {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category_id: RemoteId,
    pub tags: Vec<String>,
    pub status: ArticleStatus,
    pub is_featured: bool,
}

// ============================================================================
// Taxonomy
// ============================================================================

/// Category and tag identifier tables learned from the service.
///
/// Both tables are optional: when the endpoints are missing, records are
/// mapped from the names embedded in each article instead.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    categories: HashMap<String, String>,
    tags: HashMap<String, String>,
}

impl Taxonomy {
    pub fn new(categories: Vec<NamedRecord>, tags: Vec<NamedRecord>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .map(|r| (r.id.to_string(), r.name))
                .collect(),
            tags: tags.into_iter().map(|r| (r.id.to_string(), r.name)).collect(),
        }
    }

    pub fn category_name(&self, id: &RemoteId) -> Option<&str> {
        self.categories.get(&id.to_string()).map(String::as_str)
    }

    pub fn tag_name(&self, id: &RemoteId) -> Option<&str> {
        self.tags.get(&id.to_string()).map(String::as_str)
    }

    /// Service identifier for a category, matched on display name or slug.
    pub fn category_id(&self, category: Category) -> Option<RemoteId> {
        self.categories
            .iter()
            .find(|(_, name)| Category::from_name(name) == Some(category))
            .map(|(id, _)| match id.parse::<i64>() {
                Ok(n) => RemoteId::Number(n),
                Err(_) => RemoteId::Text(id.clone()),
            })
    }
}

// ============================================================================
// Mapping
// ============================================================================

impl RemoteArticle {
    /// Convert to the local article shape, filling gaps with defaults.
    ///
    /// `today` stands in for a missing or unparseable publish date.
    pub fn into_article(self, taxonomy: &Taxonomy, today: NaiveDate) -> Article {
        let category = self.resolve_category(taxonomy);

        let tags = dedup_tags(self.tags.iter().filter_map(|t| {
            t.name
                .clone()
                .or_else(|| t.id.as_ref().and_then(|id| taxonomy.tag_name(id)).map(str::to_string))
        }));

        let status = match self.status.as_deref() {
            None => ArticleStatus::Published,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(id = %self.id, status = %raw, "Unknown article status, treating as draft");
                ArticleStatus::Draft
            }),
        };

        let publish_date = self
            .published_at
            .as_deref()
            .and_then(parse_publish_date)
            .unwrap_or(today);

        let title = self.title.unwrap_or_default();
        let content = self.content.unwrap_or_default();

        Article {
            id: self.id.to_string(),
            slug: slugify(&title),
            read_time: Some(estimate_read_time(&content)),
            title,
            summary: self.summary.unwrap_or_default(),
            content,
            image: self
                .image_url
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            category,
            tags,
            author: self
                .author_name
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            publish_date,
            views: self.views.unwrap_or(0).max(0).unsigned_abs(),
            status,
            placement: Placement {
                is_hero: self.is_featured.unwrap_or(false),
                ..Placement::default()
            },
        }
    }

    fn resolve_category(&self, taxonomy: &Taxonomy) -> Category {
        let by_name = self.category_name.as_deref().and_then(Category::from_name);
        let by_id = || {
            self.category_id
                .as_ref()
                .and_then(|id| taxonomy.category_name(id))
                .and_then(Category::from_name)
        };
        by_name.or_else(by_id).unwrap_or_else(|| {
            tracing::debug!(
                id = %self.id,
                category = ?self.category_name,
                "Unrecognized category, filing under National"
            );
            Category::National
        })
    }
}

impl ArticleBody {
    pub fn from_article(article: &Article, taxonomy: &Taxonomy) -> Self {
        Self {
            title: article.title.clone(),
            summary: article.summary.clone(),
            content: article.content.clone(),
            category_id: taxonomy
                .category_id(article.category)
                .unwrap_or_else(|| RemoteId::Text(article.category.slug().to_string())),
            tags: article.tags.clone(),
            status: article.status,
            is_featured: article.placement.is_hero,
        }
    }
}

/// Accepts RFC 3339 timestamps, naive timestamps, and bare dates.
fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
