//! Integration tests for the content store: load, article writes, and
//! supplementary persistence.
//!
//! Each test runs its own mock content service. Storage is an in-process
//! `MemoryStorage` (clones share state, so a test can reopen the store over
//! the same data) or an in-memory SQLite database.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsdesk::model::{Article, Category, HomePageContent};
use newsdesk::remote::ContentApi;
use newsdesk::storage::{Database, LocalStorage, MemoryStorage};
use newsdesk::store::{
    seed_articles, seed_supplementary, ContentStore, Snapshot, StoreEvent, StoreOptions, SyncState,
    DEFAULT_STORAGE_KEY,
};

fn store_for<S: LocalStorage>(server: &MockServer, storage: S) -> ContentStore<S> {
    let api = ContentApi::new(&format!("{}/api", server.uri())).unwrap();
    ContentStore::new(api, storage, StoreOptions::default())
}

fn draft(title: &str) -> Article {
    Article::draft(
        title,
        Category::Health,
        "Health Desk",
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
    )
}

async fn mount_articles(server: &MockServer, articles: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "articles": articles })))
        .mount(server)
        .await;
}

async fn persisted_snapshot(storage: &impl LocalStorage) -> Snapshot {
    let raw = storage
        .get_item(DEFAULT_STORAGE_KEY)
        .await
        .unwrap()
        .expect("snapshot written");
    serde_json::from_str(&raw).unwrap()
}

// ============================================================================
// Load
// ============================================================================

#[tokio::test]
async fn test_load_from_service_replaces_collection() {
    let server = MockServer::start().await;
    mount_articles(
        &server,
        json!([
            {"id": 1, "title": "One", "category_name": "Sports"},
            {"id": 2, "title": "Two", "category_id": 7},
            {"id": 3, "title": "Three", "status": "draft"}
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"categories": [{"id": 7, "name": "Health"}]})),
        )
        .mount(&server)
        .await;

    let mut store = store_for(&server, MemoryStorage::new());
    let mut events = store.subscribe();
    store.load().await;

    assert_eq!(store.articles().count(), 3);
    assert!(store.error().is_none());
    assert!(!store.is_loading());
    assert_eq!(store.article("2").unwrap().category, Category::Health);
    assert_eq!(store.sync_state("1"), Some(SyncState::Synced));

    let mut loading = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let StoreEvent::LoadingChanged(flag) = event {
            loading.push(flag);
        }
    }
    assert_eq!(loading, vec![true, false]);
}

#[tokio::test]
async fn test_load_failure_without_snapshot_uses_seed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let storage = MemoryStorage::new();
    let mut store = store_for(&server, storage.clone());
    store.load().await;

    let articles: Vec<Article> = store.articles().cloned().collect();
    assert_eq!(articles, seed_articles());
    assert!(store.error().is_some());
    assert!(store
        .tracked_articles()
        .iter()
        .all(|t| t.sync == SyncState::LocalOnly));

    // The seed set is written as the offline fallback
    let snapshot = persisted_snapshot(&storage).await;
    assert_eq!(snapshot.articles, Some(seed_articles()));
}

#[tokio::test]
async fn test_load_failure_restores_persisted_articles() {
    let server = MockServer::start().await;
    let storage = MemoryStorage::new();

    let mut kept = draft("Kept Offline");
    kept.id = "offline-1".to_string();
    let snapshot = Snapshot {
        articles: Some(vec![kept.clone()]),
        ..Snapshot::default()
    };
    storage
        .set_item(DEFAULT_STORAGE_KEY, &serde_json::to_string(&snapshot).unwrap())
        .await
        .unwrap();

    let mut store = store_for(&server, storage);
    store.load().await;

    let articles: Vec<&Article> = store.articles().collect();
    assert_eq!(articles, vec![&kept]);
    assert_eq!(store.sync_state("offline-1"), Some(SyncState::LocalOnly));
}

#[tokio::test]
async fn test_load_success_keeps_persisted_supplementary() {
    let server = MockServer::start().await;
    mount_articles(&server, json!([])).await;

    let storage = MemoryStorage::new();
    let snapshot = Snapshot {
        tags: vec!["Elections".to_string()],
        breaking_speed_ms: 15_000,
        ..Snapshot::default()
    };
    storage
        .set_item(DEFAULT_STORAGE_KEY, &serde_json::to_string(&snapshot).unwrap())
        .await
        .unwrap();

    let mut store = store_for(&server, storage);
    store.load().await;

    assert_eq!(store.articles().count(), 0);
    assert_eq!(store.tags(), ["Elections".to_string()]);
    assert_eq!(store.ticker().speed_ms, 15_000);
}

#[tokio::test]
async fn test_unreadable_snapshot_is_ignored() {
    let server = MockServer::start().await;
    mount_articles(&server, json!([])).await;

    let storage = MemoryStorage::new();
    storage
        .set_item(DEFAULT_STORAGE_KEY, "{not json")
        .await
        .unwrap();

    let mut store = store_for(&server, storage);
    store.load().await;

    assert!(store.error().is_none());
    let seed = seed_supplementary();
    assert_eq!(store.ticker(), &seed.ticker);
    assert_eq!(store.tags(), seed.tags.as_slice());
}

// ============================================================================
// Article writes
// ============================================================================

#[tokio::test]
async fn test_add_article_appends_server_version() {
    let server = MockServer::start().await;
    mount_articles(&server, json!([{"id": 1, "title": "Existing"}])).await;
    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "article": {"id": 99, "title": "Flu Clinics", "category_name": "Health"}
        })))
        .mount(&server)
        .await;

    let mut store = store_for(&server, MemoryStorage::new());
    store.load().await;
    let created = store.add_article(draft("Flu Clinics")).await.unwrap();

    assert_eq!(created.id, "99");
    assert_eq!(store.articles().last().unwrap().id, "99");
    assert_eq!(store.sync_state("99"), Some(SyncState::Synced));
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_add_article_failure_keeps_draft() {
    let server = MockServer::start().await;
    mount_articles(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut store = store_for(&server, MemoryStorage::new());
    store.load().await;
    let article = draft("Offline Draft");
    let result = store.add_article(article.clone()).await;

    assert!(result.is_err());
    assert_eq!(store.articles().last(), Some(&article));
    assert_eq!(store.sync_state(&article.id), Some(SyncState::LocalOnly));
    assert!(store.error().is_some());
    assert_eq!(store.local_only_articles().len(), 1);
}

#[tokio::test]
async fn test_update_article_failure_applies_locally() {
    let server = MockServer::start().await;
    mount_articles(&server, json!([{"id": 5, "title": "Before"}])).await;
    Mock::given(method("PUT"))
        .and(path("/api/articles/5"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let mut store = store_for(&server, MemoryStorage::new());
    store.load().await;

    let mut edited = store.article("5").unwrap().clone();
    edited.set_title("After");
    assert!(store.update_article(edited).await.is_err());

    assert_eq!(store.article("5").unwrap().title, "After");
    assert_eq!(store.sync_state("5"), Some(SyncState::LocalOnly));
    assert!(store.error().unwrap().contains("update"));
}

#[tokio::test]
async fn test_update_article_success_uses_response() {
    let server = MockServer::start().await;
    mount_articles(&server, json!([{"id": 5, "title": "Before"}])).await;
    Mock::given(method("PUT"))
        .and(path("/api/articles/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "article": {"id": 5, "title": "After (edited)", "views": 12}
        })))
        .mount(&server)
        .await;

    let mut store = store_for(&server, MemoryStorage::new());
    store.load().await;

    let mut edited = store.article("5").unwrap().clone();
    edited.set_title("After");
    let updated = store.update_article(edited).await.unwrap();

    assert_eq!(updated.title, "After (edited)");
    assert_eq!(store.article("5").unwrap().views, 12);
    assert_eq!(store.articles().count(), 1);
}

#[tokio::test]
async fn test_delete_article_removes_locally_even_on_failure() {
    let server = MockServer::start().await;
    mount_articles(
        &server,
        json!([{"id": 1, "title": "Keep"}, {"id": 2, "title": "Drop"}]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut store = store_for(&server, MemoryStorage::new());
    store.load().await;
    assert!(store.delete_article("2").await.is_err());

    assert!(store.article("2").is_none());
    assert!(store.article("1").is_some());
    assert!(store.error().is_some());
}

#[tokio::test]
async fn test_delete_article_success() {
    let server = MockServer::start().await;
    mount_articles(&server, json!([{"id": 1, "title": "Gone"}])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/articles/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut store = store_for(&server, MemoryStorage::new());
    store.load().await;
    store.delete_article("1").await.unwrap();

    assert_eq!(store.articles().count(), 0);
    assert!(store.error().is_none());
}

// ============================================================================
// Supplementary state
// ============================================================================

#[tokio::test]
async fn test_mini_player_moves_between_videos() {
    let server = MockServer::start().await;
    let mut store = store_for(&server, MemoryStorage::new());
    store.load().await;
    assert_eq!(store.mini_player_video().unwrap().id, "video-1");

    store.set_mini_player_video("video-2").await.unwrap();

    assert_eq!(store.mini_player_video().unwrap().id, "video-2");
    let flagged: Vec<&str> = store
        .videos()
        .iter()
        .filter(|v| v.is_mini_player)
        .map(|v| v.id.as_str())
        .collect();
    assert_eq!(flagged, vec!["video-2"]);
}

#[tokio::test]
async fn test_supplementary_snapshot_round_trips() {
    let server = MockServer::start().await;
    let storage = MemoryStorage::new();
    let mut store = store_for(&server, storage.clone());
    store.load().await;

    store.add_tag("Elections").await.unwrap();
    store.add_breaking_item("Polls close at 8 pm").await.unwrap();
    store
        .set_home_page_content(HomePageContent {
            latest_news_title: "Just In".to_string(),
            ..HomePageContent::default()
        })
        .await;

    let raw = storage.get_item(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
    let snapshot: Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(serde_json::to_string(&snapshot).unwrap(), raw);

    let mut reopened = store_for(&server, storage);
    reopened.load().await;
    assert_eq!(reopened.tags(), store.tags());
    assert_eq!(reopened.ticker(), store.ticker());
    assert_eq!(reopened.home_page_content().latest_news_title, "Just In");
}

#[tokio::test]
async fn test_ticker_speed_survives_reload() {
    let server = MockServer::start().await;
    let db = Database::open(":memory:").await.unwrap();

    let mut store = store_for(&server, db);
    store.load().await;
    assert_eq!(store.ticker().speed_ms, 22_000);
    let items = store.ticker().items.clone();
    assert_eq!(items.len(), 3);

    store.set_breaking_speed(9000).await.unwrap();
    let db = store.shutdown().await;

    let mut reopened = store_for(&server, db);
    reopened.load().await;
    assert_eq!(reopened.ticker().speed_ms, 9000);
    assert_eq!(reopened.ticker().items, items);
}

#[tokio::test]
async fn test_persist_failure_keeps_memory_state() {
    let server = MockServer::start().await;
    let mut store = store_for(&server, MemoryStorage::with_quota(16));
    store.load().await;

    store.add_tag("Elections").await.unwrap();
    assert!(store.tags().iter().any(|t| t == "Elections"));
}

#[tokio::test]
async fn test_supplementary_save_keeps_fallback_articles() {
    let server = MockServer::start().await;
    let storage = MemoryStorage::new();
    let mut store = store_for(&server, storage.clone());
    store.load().await;

    store.set_breaking_pause_on_hover(false).await;

    let snapshot = persisted_snapshot(&storage).await;
    assert_eq!(snapshot.articles, Some(seed_articles()));
    assert!(!snapshot.breaking_pause_on_hover);
}
