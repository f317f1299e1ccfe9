use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::wire::{
    ArticleBody, ArticleEnvelope, ArticlesEnvelope, CategoriesEnvelope, NamedRecord,
    RemoteArticle, TagsEnvelope,
};

/// Errors talking to the content API.
///
/// Requests carry no timeout; they run until the transport gives up.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body was not the expected JSON shape
    #[error("Unexpected response body: {0}")]
    Decode(String),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Thin client for the articles/categories/tags endpoints.
///
/// Session credentials are whatever cookies the service has set on this
/// client; the store never handles tokens.
#[derive(Debug, Clone)]
pub struct ContentApi {
    client: reqwest::Client,
    base: Url,
}

impl ContentApi {
    /// Build a client with its own cookie jar.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ApiError::Network)?;
        Self::with_client(client, base_url)
    }

    /// Use an existing client (shared connection pool or custom settings).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let base =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        match base.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ApiError::InvalidBaseUrl(format!(
                    "{base_url}: unsupported scheme {other}"
                )))
            }
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn fetch_articles(&self) -> Result<Vec<RemoteArticle>, ApiError> {
        let envelope: ArticlesEnvelope = self.get(&["articles"]).await?;
        Ok(envelope.articles)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<NamedRecord>, ApiError> {
        let envelope: CategoriesEnvelope = self.get(&["categories"]).await?;
        Ok(envelope.categories)
    }

    pub async fn fetch_tags(&self) -> Result<Vec<NamedRecord>, ApiError> {
        let envelope: TagsEnvelope = self.get(&["tags"]).await?;
        Ok(envelope.tags)
    }

    pub async fn create_article(&self, body: &ArticleBody) -> Result<RemoteArticle, ApiError> {
        let url = self.endpoint(&["articles"]);
        tracing::debug!(url = %url, title = %body.title, "Creating article");
        let response = self.client.post(url).json(body).send().await?;
        let envelope: ArticleEnvelope = decode(response).await?;
        Ok(envelope.article)
    }

    pub async fn update_article(
        &self,
        id: &str,
        body: &ArticleBody,
    ) -> Result<RemoteArticle, ApiError> {
        let url = self.endpoint(&["articles", id]);
        tracing::debug!(url = %url, "Updating article");
        let response = self.client.put(url).json(body).send().await?;
        let envelope: ArticleEnvelope = decode(response).await?;
        Ok(envelope.article)
    }

    pub async fn delete_article(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["articles", id]);
        tracing::debug!(url = %url, "Deleting article");
        let response = self.client.delete(url).send().await?;
        check_status(&response)?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments);
        tracing::debug!(url = %url, "Fetching");
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::HttpStatus(status.as_u16()))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    check_status(&response)?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
