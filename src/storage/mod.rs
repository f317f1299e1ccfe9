//! Local persistence behind the [`LocalStorage`] trait.
//!
//! - [`Database`] - SQLite file (or `:memory:`) via sqlx
//! - [`MemoryStorage`] - process-local map with an optional quota

mod memory;
mod records;
mod schema;
mod types;

pub use memory::MemoryStorage;
pub use schema::Database;
pub use types::{LocalStorage, StorageError};
