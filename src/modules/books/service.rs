//! Request-level catalog operations, stateless between calls.

use std::sync::Arc;

use super::errors::BookStoreError;
use super::models::{
    Book, BookDraft, BookFilter, BookPatch, DeleteConfirmation, ListMeta, ListQuery, ListResponse,
};
use super::repository::BookRepository;

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn BookRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Books matching the single filter chosen by `query`, plus catalog-wide counts
    pub async fn list(&self, query: &ListQuery) -> Result<ListResponse, BookStoreError> {
        let filter = query.filter();
        tracing::debug!(?filter, "listing books");

        let books = self.repository.find_many(&filter).await?;
        let total = self.repository.count(&BookFilter::All).await?;
        let out_of_stock = self.repository.count(&BookFilter::Stock(0)).await?;

        Ok(ListResponse {
            books,
            meta: ListMeta {
                total,
                out_of_stock,
            },
        })
    }

    pub async fn get(&self, id: &str) -> Result<Book, BookStoreError> {
        self.repository.find_by_id(id).await
    }

    pub async fn create(&self, draft: BookDraft) -> Result<Book, BookStoreError> {
        self.repository.insert(draft).await
    }

    pub async fn update(&self, id: &str, patch: BookPatch) -> Result<Book, BookStoreError> {
        self.repository.update_by_id(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteConfirmation, BookStoreError> {
        self.repository.delete_by_id(id).await?;
        Ok(DeleteConfirmation {
            message: "Book deleted successfully".to_string(),
        })
    }

    pub async fn genres(&self) -> Result<Vec<String>, BookStoreError> {
        self.repository.distinct_genres().await
    }

    pub async fn authors(&self) -> Result<Vec<String>, BookStoreError> {
        self.repository.distinct_authors().await
    }

    /// Number of stored books
    pub async fn total(&self) -> Result<usize, BookStoreError> {
        self.repository.count(&BookFilter::All).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::repository::SledBookRepository;
    use bookstore_db::Database;

    fn service() -> CatalogService {
        let repository = SledBookRepository::new(&Database::temporary().unwrap()).unwrap();
        CatalogService::new(Arc::new(repository))
    }

    fn draft(title: &str, genre: &str, stock: f64) -> BookDraft {
        BookDraft {
            title: Some(title.into()),
            author: Some("X".into()),
            genre: Some(genre.into()),
            price: Some(10.0),
            stock: Some(stock),
            published_year: None,
        }
    }

    #[tokio::test]
    async fn meta_ignores_the_active_filter() {
        let service = service();
        service.create(draft("A", "Fiction", 0.0)).await.unwrap();
        service.create(draft("B", "Poetry", 3.0)).await.unwrap();

        let listed = service
            .list(&ListQuery {
                genre: Some("Poetry".into()),
                ..ListQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(listed.books.len(), 1);
        assert_eq!(listed.books[0].title, "B");
        assert_eq!(
            listed.meta,
            ListMeta {
                total: 2,
                out_of_stock: 1
            }
        );
    }

    #[tokio::test]
    async fn search_ignores_genre_and_author() {
        let service = service();
        service.create(draft("Fiction Atlas", "Maps", 1.0)).await.unwrap();
        service.create(draft("B", "Poetry", 1.0)).await.unwrap();

        let listed = service
            .list(&ListQuery {
                search: Some("atlas".into()),
                genre: Some("Poetry".into()),
                author: Some("nobody".into()),
            })
            .await
            .unwrap();

        assert_eq!(listed.books.len(), 1);
        assert_eq!(listed.books[0].title, "Fiction Atlas");
    }

    #[tokio::test]
    async fn delete_confirms_and_then_reports_not_found() {
        let service = service();
        let book = service.create(draft("A", "Fiction", 1.0)).await.unwrap();

        let confirmation = service.delete(&book.id).await.unwrap();
        assert_eq!(confirmation.message, "Book deleted successfully");
        assert!(matches!(
            service.delete(&book.id).await,
            Err(BookStoreError::NotFound)
        ));
        assert_eq!(service.total().await.unwrap(), 0);
    }
}
