use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use super::store::StoreError;

/// Collection-level operation whose store failure is reported as a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    FetchBooks,
    CreateBook,
    DeleteBooks,
}

impl StoreAction {
    pub fn message(self) -> &'static str {
        match self {
            StoreAction::FetchBooks => "Could not fetch books",
            StoreAction::CreateBook => "Could not create book",
            StoreAction::DeleteBooks => "Could not delete books",
        }
    }
}

/// Every non-success reply of the books API.
///
/// Client-input problems are answered as plain text with a 200 status;
/// existing clients match on the exact strings.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("no book exists")]
    NoBook,

    /// Posting a comment to a well-formed id that matches nothing.
    // Differs from `NoBook` by the trailing "!"; clients match on both.
    #[error("no book exists!")]
    NoBookForComment,

    #[error("{}: {source}", .action.message())]
    Store {
        action: StoreAction,
        #[source]
        source: StoreError,
    },
}

impl CatalogError {
    pub fn store(action: StoreAction, source: StoreError) -> Self {
        Self::Store { action, source }
    }

    /// Map a store failure on a single-book route.
    ///
    /// These routes do not distinguish "store unavailable" from "no such
    /// book"; both read as `no book exists`. This is the only place that
    /// decision is made.
    pub fn single_book(source: StoreError) -> Self {
        tracing::error!(error = %source, "store failure on single-book route");
        Self::NoBook
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self {
            CatalogError::Store { action, source } => {
                tracing::error!(error = %source, "{}", action.message());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": action.message() })),
                )
                    .into_response()
            }
            reply => reply.to_string().into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn client_replies_are_plain_text_with_ok_status() {
        let cases = [
            (CatalogError::MissingField("title"), "missing required field title"),
            (CatalogError::MissingField("comment"), "missing required field comment"),
            (CatalogError::NoBook, "no book exists"),
            (CatalogError::NoBookForComment, "no book exists!"),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("text/plain"));
            assert_eq!(body_text(response).await, expected);
        }
    }

    #[tokio::test]
    async fn store_failures_are_json_500s() {
        let response =
            CatalogError::store(StoreAction::DeleteBooks, StoreError::Closed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            r#"{"error":"Could not delete books"}"#
        );
    }

    #[test]
    fn single_book_failures_fold_into_not_found() {
        assert!(matches!(
            CatalogError::single_book(StoreError::Closed),
            CatalogError::NoBook
        ));
    }
}
