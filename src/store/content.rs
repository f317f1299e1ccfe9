use chrono::NaiveDate;
use tokio::sync::broadcast;

use crate::model::{Article, PLACEHOLDER_IMAGE};
use crate::remote::{ArticleBody, ContentApi, RemoteArticle, Taxonomy};
use crate::storage::LocalStorage;

use super::snapshot::{Snapshot, SnapshotView, Supplementary};
use super::{seed, StoreError, StoreEvent, SyncState, TrackedArticle, DEFAULT_STORAGE_KEY};

const EVENT_CAPACITY: usize = 64;

/// Construction options for [`ContentStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Local persistence key for the snapshot.
    pub storage_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Content cache mediating between the content service and local storage.
///
/// Construct one per application, call [`load`](Self::load) once, and hand
/// it to consumers by reference. Every operation takes `&mut self`, so
/// edits apply one at a time and the last write wins.
pub struct ContentStore<S> {
    pub(super) api: ContentApi,
    pub(super) storage: S,
    pub(super) storage_key: String,
    pub(super) articles: Vec<TrackedArticle>,
    /// Articles from the persisted offline fallback, carried into every
    /// snapshot write so supplementary saves do not erase them.
    pub(super) fallback_articles: Option<Vec<Article>>,
    pub(super) supplementary: Supplementary,
    pub(super) taxonomy: Taxonomy,
    pub(super) is_loading: bool,
    pub(super) error: Option<String>,
    pub(super) events: broadcast::Sender<StoreEvent>,
}

impl<S: LocalStorage> ContentStore<S> {
    /// Create an empty store. Nothing is fetched or read until
    /// [`load`](Self::load).
    pub fn new(api: ContentApi, storage: S, options: StoreOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            storage,
            storage_key: options.storage_key,
            articles: Vec::new(),
            fallback_articles: None,
            supplementary: seed::supplementary(),
            taxonomy: Taxonomy::default(),
            is_loading: false,
            error: None,
            events,
        }
    }

    /// Receive change notifications from this point on.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ========================================================================
    // Initialization
    // ========================================================================

    /// Populate the store.
    ///
    /// 1. Fetch articles (plus optional categories/tags) from the service.
    /// 2. On failure, use the persisted articles, or the seed set; the seed
    ///    set is persisted as the fallback when nothing was stored before.
    /// 3. Load supplementary state from the snapshot, or seed it.
    ///
    /// Never fails; problems end up in [`error`](Self::error).
    pub async fn load(&mut self) {
        self.set_loading(true);
        self.set_error(None);

        let remote = self.fetch_remote_articles().await;
        let snapshot = self.read_snapshot().await;
        let (stored_articles, supplementary) = match snapshot {
            Some(s) => {
                let (articles, state) = s.into_parts();
                (articles, Some(state))
            }
            None => (None, None),
        };
        let had_snapshot = supplementary.is_some();

        match remote {
            Ok(articles) => {
                tracing::info!(count = articles.len(), "Loaded articles from content service");
                self.articles = articles.into_iter().map(TrackedArticle::synced).collect();
                self.fallback_articles = stored_articles;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Content service unavailable, using local data");
                self.set_error(Some(format!("Failed to load articles: {e}")));

                match stored_articles {
                    Some(articles) => {
                        tracing::info!(count = articles.len(), "Restored articles from local snapshot");
                        self.articles = articles
                            .iter()
                            .cloned()
                            .map(TrackedArticle::local_only)
                            .collect();
                        self.fallback_articles = Some(articles);
                    }
                    None => {
                        let articles = seed::articles();
                        tracing::info!(count = articles.len(), "Using built-in articles");
                        self.articles = articles
                            .iter()
                            .cloned()
                            .map(TrackedArticle::local_only)
                            .collect();
                        if !had_snapshot {
                            self.fallback_articles = Some(articles);
                            self.supplementary = seed::supplementary();
                            self.persist().await;
                        }
                    }
                }
            }
        }

        self.supplementary = supplementary.unwrap_or_else(seed::supplementary);
        self.notify(StoreEvent::ArticlesChanged);
        self.notify(StoreEvent::SupplementaryChanged);
        self.set_loading(false);
    }

    async fn fetch_remote_articles(&mut self) -> Result<Vec<Article>, StoreError> {
        let remote = self.api.fetch_articles().await?;

        let (categories, tags) =
            futures::future::join(self.api.fetch_categories(), self.api.fetch_tags()).await;
        let categories = categories.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "No category list from service, using embedded names");
            Vec::new()
        });
        let tags = tags.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "No tag list from service, using embedded names");
            Vec::new()
        });
        self.taxonomy = Taxonomy::new(categories, tags);

        let today = today();
        Ok(remote
            .into_iter()
            .map(|r| r.into_article(&self.taxonomy, today))
            .collect())
    }

    async fn read_snapshot(&self) -> Option<Snapshot> {
        let raw = match self.storage.get_item(&self.storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.storage_key, error = %e, "Failed to read local snapshot");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(key = %self.storage_key, error = %e, "Ignoring unreadable local snapshot");
                None
            }
        }
    }

    /// Flush the snapshot one last time and hand back the storage.
    pub async fn shutdown(self) -> S {
        self.persist().await;
        tracing::debug!(key = %self.storage_key, "Content store shut down");
        self.storage
    }

    // ========================================================================
    // Article mutations
    // ========================================================================

    /// Create an article on the service and append it.
    ///
    /// On success the server's version (with its id) is appended and
    /// returned. On failure the draft is appended unchanged as
    /// [`SyncState::LocalOnly`] and the error is returned.
    pub async fn add_article(&mut self, draft: Article) -> Result<Article, StoreError> {
        let body = ArticleBody::from_article(&draft, &self.taxonomy);
        match self.api.create_article(&body).await {
            Ok(remote) => {
                let created = self.canonical(remote, &draft);
                tracing::info!(id = %created.id, title = %created.title, "Article created");
                self.articles.push(TrackedArticle::synced(created.clone()));
                self.notify(StoreEvent::ArticlesChanged);
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, id = %draft.id, "Create failed, keeping article locally");
                self.articles.push(TrackedArticle::local_only(draft));
                self.notify(StoreEvent::ArticlesChanged);
                self.set_error(Some(format!("Failed to create article: {e}")));
                Err(e.into())
            }
        }
    }

    /// Send an update and replace the local copy with the result.
    ///
    /// On failure the caller's version replaces the local copy anyway.
    pub async fn update_article(&mut self, article: Article) -> Result<Article, StoreError> {
        let body = ArticleBody::from_article(&article, &self.taxonomy);
        match self.api.update_article(&article.id, &body).await {
            Ok(remote) => {
                let updated = self.canonical(remote, &article);
                tracing::info!(id = %article.id, "Article updated");
                self.replace_article(&article.id, TrackedArticle::synced(updated.clone()));
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!(error = %e, id = %article.id, "Update failed, applying locally");
                let id = article.id.clone();
                self.replace_article(&id, TrackedArticle::local_only(article));
                self.set_error(Some(format!("Failed to update article: {e}")));
                Err(e.into())
            }
        }
    }

    /// Delete on the service; the local copy is removed either way.
    pub async fn delete_article(&mut self, id: &str) -> Result<(), StoreError> {
        let result = self.api.delete_article(id).await;
        let before = self.articles.len();
        self.articles.retain(|t| t.article.id != id);
        if self.articles.len() != before {
            self.notify(StoreEvent::ArticlesChanged);
        }

        match result {
            Ok(()) => {
                tracing::info!(id = %id, "Article deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, id = %id, "Delete failed, removed locally");
                self.set_error(Some(format!("Failed to delete article: {e}")));
                Err(e.into())
            }
        }
    }

    /// Count a page view locally. Not sent to the service, not persisted.
    pub fn record_view(&mut self, id: &str) -> Result<u64, StoreError> {
        let tracked = self
            .articles
            .iter_mut()
            .find(|t| t.article.id == id)
            .ok_or_else(|| StoreError::UnknownArticle(id.to_string()))?;
        tracked.article.views = tracked.article.views.saturating_add(1);
        let views = tracked.article.views;
        self.notify(StoreEvent::ArticlesChanged);
        Ok(views)
    }

    /// Map a service response, keeping the client-only fields the service
    /// does not return.
    fn canonical(&self, remote: RemoteArticle, submitted: &Article) -> Article {
        let mut article = remote.into_article(&self.taxonomy, submitted.publish_date);
        if article.image == PLACEHOLDER_IMAGE {
            article.image = submitted.image.clone();
        }
        if submitted.read_time.is_some() {
            article.read_time = submitted.read_time;
        }
        article.placement.home_section = submitted.placement.home_section;
        article.placement.category_spot = submitted.placement.category_spot;
        article
    }

    fn replace_article(&mut self, id: &str, replacement: TrackedArticle) {
        match self.articles.iter_mut().find(|t| t.article.id == id) {
            Some(slot) => {
                *slot = replacement;
                self.notify(StoreEvent::ArticlesChanged);
            }
            None => tracing::debug!(id = %id, "Updated article is not cached locally"),
        }
    }

    // ========================================================================
    // State plumbing
    // ========================================================================

    /// Write supplementary state (and any stored article fallback).
    /// Failures are logged only.
    pub(super) async fn persist(&self) {
        let view = SnapshotView::new(&self.supplementary, self.fallback_articles.as_deref());
        let json = match serde_json::to_string(&view) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize local snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(&self.storage_key, &json).await {
            tracing::warn!(key = %self.storage_key, error = %e, "Failed to write local snapshot");
        }
    }

    pub(super) fn notify(&self, event: StoreEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }

    fn set_loading(&mut self, loading: bool) {
        if self.is_loading != loading {
            self.is_loading = loading;
            self.notify(StoreEvent::LoadingChanged(loading));
        }
    }

    pub(super) fn set_error(&mut self, error: Option<String>) {
        if self.error != error {
            self.error = error.clone();
            self.notify(StoreEvent::ErrorChanged(error));
        }
    }

    /// Dismiss the current error notice.
    pub fn clear_error(&mut self) {
        self.set_error(None);
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Most recent failure message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn sync_state(&self, id: &str) -> Option<SyncState> {
        self.articles
            .iter()
            .find(|t| t.article.id == id)
            .map(|t| t.sync)
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
