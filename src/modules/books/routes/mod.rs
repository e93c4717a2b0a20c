//! HTTP handlers for the books module.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::error::AppError;

use super::errors::BookStoreError;
use super::models::{Book, BookDraft, BookPatch, DeleteConfirmation, ListQuery, ListResponse};
use super::service::CatalogService;

/// Routes relative to the module mount point (`/api/books`)
pub fn router(service: CatalogService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/genres", get(list_genres))
        .route("/authors", get(list_authors))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(service)
}

async fn list_books(
    State(service): State<CatalogService>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Query(query) = query?;
    Ok(Json(service.list(&query).await?))
}

async fn get_book(
    State(service): State<CatalogService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    Ok(Json(service.get(&id).await?))
}

async fn create_book(
    State(service): State<CatalogService>,
    payload: Result<Json<BookDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(draft) = payload?;
    let book = service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(service): State<CatalogService>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(rejection) => {
            // An unknown id is reported as such whatever the body looks like
            service.get(&id).await?;
            return Err(rejection.into());
        }
    };
    Ok(Json(service.update(&id, patch).await?))
}

async fn delete_book(
    State(service): State<CatalogService>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteConfirmation>, AppError> {
    let id = book_id(id)?;
    Ok(Json(service.delete(&id).await?))
}

async fn list_genres(
    State(service): State<CatalogService>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(service.genres().await?))
}

async fn list_authors(
    State(service): State<CatalogService>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(service.authors().await?))
}

/// An id segment that cannot even be decoded names no book.
fn book_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "undecodable book id");
            Err(BookStoreError::NotFound.into())
        }
    }
}
