//! HTTP client for the bookstore API.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::form::FormError;
use crate::types::{
    Book, BookDraft, BookPatch, DeleteConfirmation, ErrorBody, ListQuery, ListResponse,
};

const HOSTED_DEV_DOMAIN: &str = ".app.github.dev";
const FRONTEND_PORT: &str = "3000";
const BACKEND_PORT: &str = "5000";

/// Failures seen by client code
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status; `message` is its `{message}` body
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Form(#[from] FormError),
}

impl ClientError {
    /// HTTP status when the API itself rejected the request
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Base API URL for a page served from `hostname`.
///
/// Hosted development environments publish each port under its own
/// hostname, so the backend lives at the frontend's hostname with the port
/// swapped. Everything else talks to the local backend.
pub fn resolve_api_url(hostname: &str) -> String {
    if hostname.contains(HOSTED_DEV_DOMAIN) {
        format!(
            "https://{}/api",
            hostname.replace(FRONTEND_PORT, BACKEND_PORT)
        )
    } else {
        format!("http://localhost:{BACKEND_PORT}/api")
    }
}

/// API client for the catalog endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Creates a client for `base_url` (the `/api` root, no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    fn book_url(&self, id: &str) -> String {
        format!("{}/books/{id}", self.base_url)
    }

    /// Lists books matching `query` together with the catalog counts.
    pub async fn list_books(&self, query: &ListQuery) -> Result<ListResponse, ClientError> {
        let response = self.client.get(self.books_url()).query(query).send().await?;
        parse(response).await
    }

    pub async fn get_book(&self, id: &str) -> Result<Book, ClientError> {
        let response = self.client.get(self.book_url(id)).send().await?;
        parse(response).await
    }

    pub async fn genres(&self) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/genres", self.books_url());
        parse(self.client.get(url).send().await?).await
    }

    pub async fn authors(&self) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/authors", self.books_url());
        parse(self.client.get(url).send().await?).await
    }

    pub async fn add_book(&self, draft: &BookDraft) -> Result<Book, ClientError> {
        let response = self.client.post(self.books_url()).json(draft).send().await?;
        parse(response).await
    }

    pub async fn update_book(&self, id: &str, patch: &BookPatch) -> Result<Book, ClientError> {
        let response = self.client.put(self.book_url(id)).json(patch).send().await?;
        parse(response).await
    }

    pub async fn delete_book(&self, id: &str) -> Result<DeleteConfirmation, ClientError> {
        let response = self.client.delete(self.book_url(id)).send().await?;
        parse(response).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(error) => error.message,
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
