use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// A persisted book. Every stored value satisfies the validation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier, never changes
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
    pub stock: u64,
    /// Absent is not the same as zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    /// Set once by the store at creation
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Body of a create request.
///
/// Numbers stay loosely typed so that a fractional stock or a negative price
/// reaches validation and is reported per field instead of failing decoding.
/// Unknown keys, `id` and `createdAt` included, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<f64>,
    pub published_year: Option<f64>,
}

impl BookDraft {
    /// Overlay the fields supplied in `patch`.
    pub fn apply(mut self, patch: BookPatch) -> Self {
        if patch.title.is_some() {
            self.title = patch.title;
        }
        if patch.author.is_some() {
            self.author = patch.author;
        }
        if patch.genre.is_some() {
            self.genre = patch.genre;
        }
        if patch.price.is_some() {
            self.price = patch.price;
        }
        if patch.stock.is_some() {
            self.stock = patch.stock;
        }
        if let Some(year) = patch.published_year {
            self.published_year = year;
        }
        self
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            genre: Some(book.genre.clone()),
            price: Some(book.price),
            stock: Some(book.stock as f64),
            published_year: book.published_year.map(f64::from),
        }
    }
}

/// Body of an update request; only supplied fields change.
///
/// `publishedYear: null` clears the year, an absent key keeps it. A `null` for
/// any other field is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub published_year: Option<Option<f64>>,
}

/// Distinguish an explicit `null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query string of the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
}

impl ListQuery {
    /// Pick the single filter to run: `search` wins over `genre`, which wins
    /// over `author`. Empty values count as absent.
    pub fn filter(&self) -> BookFilter {
        fn given(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        if let Some(search) = given(&self.search) {
            BookFilter::Text(search.to_string())
        } else if let Some(genre) = given(&self.genre) {
            BookFilter::Genre(genre.to_string())
        } else if let Some(author) = given(&self.author) {
            BookFilter::Author(author.to_string())
        } else {
            BookFilter::All
        }
    }
}

/// What a store read selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    All,
    /// Free-text query over title, author and genre
    Text(String),
    Genre(String),
    Author(String),
    Stock(u64),
}

/// Response of the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub books: Vec<Book>,
    pub meta: ListMeta,
}

/// Catalog-wide counts, independent of the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub total: usize,
    pub out_of_stock: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: &str, genre: &str, author: &str) -> ListQuery {
        let opt = |v: &str| (!v.is_empty()).then(|| v.to_string());
        ListQuery {
            search: opt(search),
            genre: opt(genre),
            author: opt(author),
        }
    }

    #[test]
    fn search_supersedes_equality_filters() {
        assert_eq!(
            query("dune", "Fiction", "Herbert").filter(),
            BookFilter::Text("dune".to_string())
        );
    }

    #[test]
    fn genre_wins_over_author() {
        assert_eq!(
            query("", "Fiction", "Herbert").filter(),
            BookFilter::Genre("Fiction".to_string())
        );
        assert_eq!(
            query("", "", "Herbert").filter(),
            BookFilter::Author("Herbert".to_string())
        );
    }

    #[test]
    fn empty_parameters_mean_everything() {
        let empty = ListQuery {
            search: Some(String::new()),
            genre: Some(String::new()),
            author: None,
        };
        assert_eq!(empty.filter(), BookFilter::All);
    }

    #[test]
    fn patch_distinguishes_null_year_from_missing_year() {
        let cleared: BookPatch = serde_json::from_str(r#"{"publishedYear": null}"#).unwrap();
        assert_eq!(cleared.published_year, Some(None));

        let untouched: BookPatch = serde_json::from_str(r#"{"stock": 3}"#).unwrap();
        assert_eq!(untouched.published_year, None);
        assert_eq!(untouched.stock, Some(3.0));
    }

    #[test]
    fn patch_overlays_only_supplied_fields() {
        let base = BookDraft {
            title: Some("Dune".into()),
            author: Some("Herbert".into()),
            genre: Some("Fiction".into()),
            price: Some(9.5),
            stock: Some(4.0),
            published_year: Some(1965.0),
        };
        let merged = base.clone().apply(BookPatch {
            stock: Some(0.0),
            ..BookPatch::default()
        });

        assert_eq!(merged.stock, Some(0.0));
        assert_eq!(merged.title, base.title);
        assert_eq!(merged.published_year, Some(1965.0));

        let cleared = base.apply(BookPatch {
            published_year: Some(None),
            ..BookPatch::default()
        });
        assert_eq!(cleared.published_year, None);
    }

    #[test]
    fn book_serializes_camel_case_and_omits_missing_year() {
        let book = Book {
            id: "b1".into(),
            title: "A".into(),
            author: "X".into(),
            genre: "Fiction".into(),
            price: 10.0,
            stock: 0,
            published_year: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert!(json.get("publishedYear").is_none());

        let meta = serde_json::to_value(ListMeta {
            total: 3,
            out_of_stock: 1,
        })
        .unwrap();
        assert_eq!(meta, serde_json::json!({"total": 3, "outOfStock": 1}));
    }
}
