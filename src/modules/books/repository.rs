//! Book store over the embedded document database.

use std::collections::BTreeSet;

use async_trait::async_trait;
use bookstore_db::{Collection, Database, DbError};
use time::OffsetDateTime;
use uuid::Uuid;

use super::errors::BookStoreError;
use super::models::{Book, BookDraft, BookFilter, BookPatch};
use super::validation::{current_year, validate, ValidBook};

const COLLECTION: &str = "books";

/// Persistence seam for books; every write is validated before it lands.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Validate and store a new book, assigning its id and creation time
    async fn insert(&self, draft: BookDraft) -> Result<Book, BookStoreError>;

    /// Books selected by `filter`, in a deterministic order
    async fn find_many(&self, filter: &BookFilter) -> Result<Vec<Book>, BookStoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Book, BookStoreError>;

    async fn count(&self, filter: &BookFilter) -> Result<usize, BookStoreError>;

    /// Apply the supplied fields and re-validate the whole record
    async fn update_by_id(&self, id: &str, patch: BookPatch) -> Result<Book, BookStoreError>;

    /// Hard delete; returns the removed book
    async fn delete_by_id(&self, id: &str) -> Result<Book, BookStoreError>;

    async fn distinct_genres(&self) -> Result<Vec<String>, BookStoreError>;

    async fn distinct_authors(&self) -> Result<Vec<String>, BookStoreError>;
}

/// [`BookRepository`] backed by a sled collection keyed by UUID v7, so key
/// order is insertion order.
#[derive(Clone)]
pub struct SledBookRepository {
    books: Collection<Book>,
}

impl SledBookRepository {
    pub fn new(db: &Database) -> Result<Self, DbError> {
        Ok(Self {
            books: db.collection(COLLECTION)?,
        })
    }

    fn distinct(&self, field: impl Fn(&Book) -> &str) -> Result<Vec<String>, BookStoreError> {
        let values: BTreeSet<String> = self
            .books
            .all()?
            .iter()
            .map(|book| field(book).to_string())
            .collect();
        Ok(values.into_iter().collect())
    }
}

fn assemble(id: String, created_at: OffsetDateTime, valid: ValidBook) -> Book {
    Book {
        id,
        title: valid.title,
        author: valid.author,
        genre: valid.genre,
        price: valid.price,
        stock: valid.stock,
        published_year: valid.published_year,
        created_at,
    }
}

#[async_trait]
impl BookRepository for SledBookRepository {
    async fn insert(&self, draft: BookDraft) -> Result<Book, BookStoreError> {
        let valid = validate(&draft, current_year())?;
        let book = assemble(Uuid::now_v7().to_string(), OffsetDateTime::now_utc(), valid);

        self.books.insert_new(&book.id, &book)?;
        tracing::info!(id = %book.id, title = %book.title, "book created");

        Ok(book)
    }

    async fn find_many(&self, filter: &BookFilter) -> Result<Vec<Book>, BookStoreError> {
        Ok(filter.select(self.books.all()?))
    }

    async fn find_by_id(&self, id: &str) -> Result<Book, BookStoreError> {
        self.books.get(id)?.ok_or(BookStoreError::NotFound)
    }

    async fn count(&self, filter: &BookFilter) -> Result<usize, BookStoreError> {
        match filter {
            BookFilter::All => Ok(self.books.len()),
            other => Ok(self.find_many(other).await?.len()),
        }
    }

    async fn update_by_id(&self, id: &str, patch: BookPatch) -> Result<Book, BookStoreError> {
        let year = current_year();

        let updated = self.books.update(id, |existing: Book| {
            let merged = BookDraft::from(&existing).apply(patch.clone());
            let valid = validate(&merged, year)?;
            Ok::<_, BookStoreError>(assemble(existing.id, existing.created_at, valid))
        })?;

        let book = updated.ok_or(BookStoreError::NotFound)?;
        tracing::info!(id = %book.id, "book updated");
        Ok(book)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Book, BookStoreError> {
        let removed = self.books.remove(id)?.ok_or(BookStoreError::NotFound)?;
        tracing::info!(id = %removed.id, "book deleted");
        Ok(removed)
    }

    async fn distinct_genres(&self) -> Result<Vec<String>, BookStoreError> {
        self.distinct(|book| book.genre.as_str())
    }

    async fn distinct_authors(&self) -> Result<Vec<String>, BookStoreError> {
        self.distinct(|book| book.author.as_str())
    }
}
