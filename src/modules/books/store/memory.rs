use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bookshelf_db::ObjectId;
use tokio::sync::RwLock;

use super::{BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookSummary};

#[derive(Debug, Clone)]
struct StoredBook {
    title: String,
    comments: Vec<String>,
}

impl StoredBook {
    fn to_book(&self, id: &ObjectId) -> Book {
        Book {
            id: id.to_hex(),
            title: self.title.clone(),
            comments: self.comments.clone(),
        }
    }
}

/// In-process book collection.
///
/// Identifiers are real ObjectIds, so id validation behaves exactly as it
/// does against MongoDB. Books list in identifier order, which for ids
/// minted by one process is creation order.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<BTreeMap<ObjectId, StoredBook>>,
    closed: AtomicBool,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every subsequent operation with [`StoreError::Closed`], the
    /// way a dropped connection would.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> StoreResult<Vec<BookSummary>> {
        self.ensure_open()?;
        let books = self.books.read().await;
        Ok(books
            .iter()
            .map(|(id, book)| BookSummary {
                id: id.to_hex(),
                title: book.title.clone(),
                commentcount: book.comments.len() as u64,
            })
            .collect())
    }

    async fn insert(&self, title: &str) -> StoreResult<Book> {
        self.ensure_open()?;
        let id = ObjectId::new();
        let book = StoredBook {
            title: title.to_string(),
            comments: Vec::new(),
        };
        let created = book.to_book(&id);
        self.books.write().await.insert(id, book);
        Ok(created)
    }

    async fn find(&self, id: &ObjectId) -> StoreResult<Option<Book>> {
        self.ensure_open()?;
        Ok(self.books.read().await.get(id).map(|book| book.to_book(id)))
    }

    async fn push_comment(&self, id: &ObjectId, comment: &str) -> StoreResult<Option<Book>> {
        self.ensure_open()?;
        let mut books = self.books.write().await;
        Ok(books.get_mut(id).map(|book| {
            book.comments.push(comment.to_string());
            book.to_book(id)
        }))
    }

    async fn delete(&self, id: &ObjectId) -> StoreResult<u64> {
        self.ensure_open()?;
        Ok(u64::from(self.books.write().await.remove(id).is_some()))
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        self.ensure_open()?;
        let mut books = self.books.write().await;
        let removed = books.len() as u64;
        books.clear();
        Ok(removed)
    }
}
