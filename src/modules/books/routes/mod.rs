//! Handlers for `/api/books` and `/api/books/{id}`.
//!
//! Each handler validates its input, makes exactly one store call and shapes
//! the reply.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bookshelf_db::{parse_object_id, ObjectId};
use bookshelf_http::extract::Payload;

use super::error::{CatalogError, StoreAction};
use super::models::{Book, BookSummary, CreatedBook, NewBook, NewComment};
use super::store::SharedStore;

type CatalogResult<T> = Result<T, CatalogError>;

/// Routes relative to the module mount point.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book).delete(delete_all_books))
        .route(
            "/{id}",
            get(get_book).post(add_comment).delete(delete_book),
        )
        .with_state(store)
}

fn book_id(raw: &str) -> CatalogResult<ObjectId> {
    parse_object_id(raw).ok_or(CatalogError::NoBook)
}

async fn list_books(State(store): State<SharedStore>) -> CatalogResult<Json<Vec<BookSummary>>> {
    let books = store
        .list()
        .await
        .map_err(|source| CatalogError::store(StoreAction::FetchBooks, source))?;
    Ok(Json(books))
}

async fn create_book(
    State(store): State<SharedStore>,
    Payload(body): Payload<NewBook>,
) -> CatalogResult<Json<CreatedBook>> {
    let title = body.title().ok_or(CatalogError::MissingField("title"))?;

    let book = store
        .insert(title)
        .await
        .map_err(|source| CatalogError::store(StoreAction::CreateBook, source))?;

    tracing::info!(book_id = %book.id, "book created");
    Ok(Json(book.into()))
}

async fn delete_all_books(State(store): State<SharedStore>) -> CatalogResult<&'static str> {
    let removed = store
        .delete_all()
        .await
        .map_err(|source| CatalogError::store(StoreAction::DeleteBooks, source))?;

    tracing::info!(removed, "catalog cleared");
    Ok("complete delete successful")
}

async fn get_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> CatalogResult<Json<Book>> {
    let id = book_id(&id)?;

    match store.find(&id).await {
        Ok(Some(book)) => Ok(Json(book)),
        Ok(None) => Err(CatalogError::NoBook),
        Err(source) => Err(CatalogError::single_book(source)),
    }
}

async fn add_comment(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Payload(body): Payload<NewComment>,
) -> CatalogResult<Json<Book>> {
    // The comment is checked before the id.
    let comment = body.comment().ok_or(CatalogError::MissingField("comment"))?;
    let id = book_id(&id)?;

    match store.push_comment(&id, comment).await {
        Ok(Some(book)) => {
            tracing::info!(book_id = %book.id, comments = book.comments.len(), "comment added");
            Ok(Json(book))
        }
        Ok(None) => Err(CatalogError::NoBookForComment),
        Err(source) => Err(CatalogError::single_book(source)),
    }
}

async fn delete_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> CatalogResult<&'static str> {
    let id = book_id(&id)?;

    match store.delete(&id).await {
        Ok(0) => Err(CatalogError::NoBook),
        Ok(_) => {
            tracing::info!(book_id = %id, "book deleted");
            Ok("delete successful")
        }
        Err(source) => Err(CatalogError::single_book(source)),
    }
}
