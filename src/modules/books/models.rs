use serde::{Deserialize, Serialize};

/// A book with its full comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-generated identifier (24 hex characters)
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Comments in the order they were posted
    pub comments: Vec<String>,
}

/// Listing projection of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Number of comments, derived at read time
    pub commentcount: u64,
}

/// Reply to a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBook {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
}

impl From<Book> for CreatedBook {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
        }
    }
}

/// Body of `POST /api/books`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub title: Option<String>,
}

impl NewBook {
    /// The title, if one was sent and is not empty.
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }
}

/// Body of `POST /api/books/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewComment {
    /// The comment, if one was sent and is not empty.
    pub fn comment(&self) -> Option<&str> {
        non_empty(self.comment.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identifiers_serialize_under_underscore_id() {
        let summary = BookSummary {
            id: "5f1d7f1c2b3a4c5d6e7f8091".to_string(),
            title: "Kindred".to_string(),
            commentcount: 2,
        };
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"_id": "5f1d7f1c2b3a4c5d6e7f8091", "title": "Kindred", "commentcount": 2})
        );
    }

    #[test]
    fn empty_fields_count_as_missing() {
        let book: NewBook = serde_json::from_value(json!({"title": ""})).unwrap();
        assert_eq!(book.title(), None);

        let comment: NewComment = serde_json::from_value(json!({})).unwrap();
        assert_eq!(comment.comment(), None);

        let comment: NewComment = serde_json::from_value(json!({"comment": "great"})).unwrap();
        assert_eq!(comment.comment(), Some("great"));
    }
}
