//! Domain types shared by the store, the wire mapping, and the front end.
//!
//! Articles are owned by the remote content service and cached here; every
//! other type is client-owned and lives only in local persistence.

mod article;
mod supplementary;

pub use article::{
    dedup_tags, local_id, sort_newest_first, Article, ArticleStatus, Category, CategorySpot,
    Placement, PLACEHOLDER_IMAGE,
};
pub use supplementary::{BreakingTickerConfig, EPaperItem, HomePageContent, YouTubeVideo};
