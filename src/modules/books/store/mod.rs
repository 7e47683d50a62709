//! Persistence seam for the books module.

mod memory;
mod mongo;

pub use memory::MemoryBookStore;
pub use mongo::MongoBookStore;

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_db::ObjectId;
use thiserror::Error;

use super::models::{Book, BookSummary};

/// Store handle shared by every request handler.
pub type SharedStore = Arc<dyn BookStore>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store request failed: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("stored book could not be decoded: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("store returned a non-ObjectId identifier: {0}")]
    UnexpectedId(String),

    #[error("store is closed")]
    Closed,
}

/// Operations the catalog needs from its backing collection.
///
/// Every method is a single call against the store; atomicity is per
/// document.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every book projected to id, title and comment count.
    async fn list(&self) -> StoreResult<Vec<BookSummary>>;

    /// Persist a new book with no comments.
    async fn insert(&self, title: &str) -> StoreResult<Book>;

    async fn find(&self, id: &ObjectId) -> StoreResult<Option<Book>>;

    /// Append `comment` and return the book as it is after the append, or
    /// `None` if no book has this id.
    async fn push_comment(&self, id: &ObjectId, comment: &str) -> StoreResult<Option<Book>>;

    /// Remove one book. Returns how many documents were removed (0 or 1).
    async fn delete(&self, id: &ObjectId) -> StoreResult<u64>;

    /// Remove every book. Returns how many documents were removed.
    async fn delete_all(&self) -> StoreResult<u64>;
}
