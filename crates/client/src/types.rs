//! Wire types of the bookstore API, as seen from the client.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
    pub stock: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Body of a create request; an unset year is omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
    pub stock: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<f64>,
}

/// Body of an update request.
///
/// `published_year: Some(None)` sends `null`, which clears the stored year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<Option<f64>>,
}

/// Query of the list endpoint; at most one field is set by the view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: non_empty(text.into()),
            ..Self::default()
        }
    }

    pub fn genre(genre: impl Into<String>) -> Self {
        Self {
            genre: non_empty(genre.into()),
            ..Self::default()
        }
    }

    pub fn author(author: impl Into<String>) -> Self {
        Self {
            author: non_empty(author.into()),
            ..Self::default()
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListResponse {
    pub books: Vec<Book>,
    pub meta: ListMeta,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub total: usize,
    pub out_of_stock: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

/// Error body returned by the API
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_sends_null_only_for_cleared_year() {
        let cleared = BookPatch {
            published_year: Some(None),
            ..BookPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&cleared).unwrap(),
            serde_json::json!({"publishedYear": null})
        );

        let untouched = BookPatch {
            stock: Some(2.0),
            ..BookPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&untouched).unwrap(),
            serde_json::json!({"stock": 2.0})
        );
    }

    #[test]
    fn empty_filter_values_are_dropped() {
        assert_eq!(ListQuery::genre(""), ListQuery::all());
        assert_eq!(ListQuery::search("dune").search.as_deref(), Some("dune"));
    }
}
