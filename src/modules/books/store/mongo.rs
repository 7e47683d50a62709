use async_trait::async_trait;
use bookshelf_db::ObjectId;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use super::{BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookSummary};

/// Book as persisted in the `books` collection.
#[derive(Debug, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    comments: Vec<String>,
}

impl BookDocument {
    fn into_book(self) -> StoreResult<Book> {
        let id = self
            .id
            .ok_or_else(|| StoreError::UnexpectedId("missing _id".to_string()))?;
        Ok(Book {
            id: id.to_hex(),
            title: self.title,
            comments: self.comments,
        })
    }
}

/// Shape produced by the listing pipeline.
#[derive(Debug, Deserialize)]
struct SummaryDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    title: String,
    commentcount: i64,
}

impl From<SummaryDocument> for BookSummary {
    fn from(summary: SummaryDocument) -> Self {
        Self {
            id: summary.id.to_hex(),
            title: summary.title,
            commentcount: summary.commentcount.max(0) as u64,
        }
    }
}

/// Listing pipeline: the comment count is computed server side and a book
/// stored without a `comments` array counts as zero.
fn summary_pipeline() -> Vec<Document> {
    vec![doc! {
        "$project": {
            "title": 1,
            "commentcount": { "$size": { "$ifNull": ["$comments", []] } },
        }
    }]
}

/// [`BookStore`] over a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoBookStore {
    books: Collection<BookDocument>,
}

impl MongoBookStore {
    pub fn new(database: &bookshelf_db::Database, collection: &str) -> Self {
        Self {
            books: database.collection(collection),
        }
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn list(&self) -> StoreResult<Vec<BookSummary>> {
        let documents: Vec<Document> = self
            .books
            .aggregate(summary_pipeline())
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|document| {
                mongodb::bson::from_document::<SummaryDocument>(document)
                    .map(BookSummary::from)
                    .map_err(StoreError::from)
            })
            .collect()
    }

    async fn insert(&self, title: &str) -> StoreResult<Book> {
        let document = BookDocument {
            id: None,
            title: title.to_string(),
            comments: Vec::new(),
        };
        let result = self.books.insert_one(&document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::UnexpectedId(result.inserted_id.to_string()))?;

        tracing::debug!(book_id = %id, "book inserted");
        Ok(Book {
            id: id.to_hex(),
            title: document.title,
            comments: document.comments,
        })
    }

    async fn find(&self, id: &ObjectId) -> StoreResult<Option<Book>> {
        self.books
            .find_one(doc! { "_id": *id })
            .await?
            .map(BookDocument::into_book)
            .transpose()
    }

    async fn push_comment(&self, id: &ObjectId, comment: &str) -> StoreResult<Option<Book>> {
        self.books
            .find_one_and_update(
                doc! { "_id": *id },
                doc! { "$push": { "comments": comment } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .map(BookDocument::into_book)
            .transpose()
    }

    async fn delete(&self, id: &ObjectId) -> StoreResult<u64> {
        let result = self.books.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let result = self.books.delete_many(doc! {}).await?;
        tracing::info!(removed = result.deleted_count, "all books deleted");
        Ok(result.deleted_count)
    }
}
