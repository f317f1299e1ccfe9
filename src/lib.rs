//! Content store and router for a news publishing site.
//!
//! - [`store`] - cached articles plus client-owned site content, synced with
//!   the content service and persisted locally
//! - [`remote`] - HTTP client for the content service
//! - [`storage`] - local key/value persistence
//! - [`router`] - location matching and navigation
//! - [`config`] - `config.toml` loading

pub mod config;
pub mod model;
pub mod remote;
pub mod router;
pub mod storage;
pub mod store;
pub mod util;
