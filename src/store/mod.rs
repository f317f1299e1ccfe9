//! The content store: the single source of content for every consumer.
//!
//! Articles come from the remote content service and are cached in memory;
//! when the service is unreachable the store falls back to the last
//! persisted snapshot or to a built-in seed set. Everything else (tags,
//! e-papers, videos, ticker, home-page text) is owned locally and written to
//! [`LocalStorage`](crate::storage::LocalStorage) after every change.
//!
//! # Failure policy
//!
//! Nothing here is fatal. A failed article write is applied locally anyway
//! and the article is tagged [`SyncState::LocalOnly`]; the failure message is
//! kept in [`ContentStore::error`] until the next failure overwrites it.
//! Local-only edits are never replayed against the service later.
//!
//! # Example
//!
//! ```ignore
//! let api = ContentApi::new("https://news.example.com/api")?;
//! let mut store = ContentStore::new(api, Database::open("store.db").await?, StoreOptions::default());
//! store.load().await;
//! for article in store.visible_articles(today) { ... }
//! ```

mod content;
mod query;
mod seed;
mod snapshot;
mod supplementary;

use thiserror::Error;

use crate::model::Article;
use crate::remote::ApiError;

pub use content::{ContentStore, StoreOptions};
pub use query::CategoryPage;
pub use seed::{articles as seed_articles, supplementary as seed_supplementary};
pub use snapshot::{Snapshot, Supplementary};

/// Key the snapshot is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "newsdesk-content-store";

/// Whether the service has confirmed an article's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Matches the last response from the service.
    Synced,
    /// Changed, created, or loaded without the service confirming it.
    LocalOnly,
}

/// An article together with its sync state.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedArticle {
    pub article: Article,
    pub sync: SyncState,
}

impl TrackedArticle {
    pub fn synced(article: Article) -> Self {
        Self {
            article,
            sync: SyncState::Synced,
        }
    }

    pub fn local_only(article: Article) -> Self {
        Self {
            article,
            sync: SyncState::LocalOnly,
        }
    }
}

/// Change notifications for consumers that re-render on updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    LoadingChanged(bool),
    ArticlesChanged,
    SupplementaryChanged,
    ErrorChanged(Option<String>),
}

/// Errors returned by store operations.
///
/// Remote failures are returned after the change has already been applied
/// locally.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Remote(#[from] ApiError),
    #[error("No article with id {0}")]
    UnknownArticle(String),
    #[error("No video with id {0}")]
    UnknownVideo(String),
    #[error("No e-paper with id {0}")]
    UnknownEPaper(String),
    #[error("Ticker speed must be greater than zero")]
    InvalidTickerSpeed,
    #[error("Ticker item {index} out of range (have {len})")]
    TickerIndexOutOfRange { index: usize, len: usize },
    #[error("{0} must not be empty")]
    EmptyValue(&'static str),
}
