//! Client for the remote content service.
//!
//! - [`client`] - HTTP calls against `/articles`, `/categories`, `/tags`
//! - [`wire`] - JSON shapes and their mapping onto local [`Article`]s
//!
//! [`Article`]: crate::model::Article

mod client;
mod wire;

pub use client::{ApiError, ContentApi};
pub use wire::{
    ArticleBody, NamedRecord, RemoteArticle, RemoteId, RemoteTag, Taxonomy, DEFAULT_AUTHOR,
};

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV: &str = "NEWSDESK_API_URL";
