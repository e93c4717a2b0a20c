//! Catalog screen state and the user intents that drive it.

use tracing::{debug, error};

use crate::api::{CatalogClient, ClientError};
use crate::form::BookForm;
use crate::types::{Book, ListMeta, ListQuery, ListResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.to_string(),
        }
    }
}

/// Open modals. Each slot holds at most one modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalSlots {
    pub add: bool,
    pub edit: Option<Book>,
    pub delete: Option<Book>,
}

#[derive(Debug)]
pub struct CatalogView {
    client: CatalogClient,
    pub books: Vec<Book>,
    pub genres: Vec<String>,
    pub authors: Vec<String>,
    pub meta: ListMeta,
    pub search: String,
    pub genre: String,
    pub author: String,
    pub modals: ModalSlots,
    notices: Vec<Notice>,
}

impl CatalogView {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            books: Vec::new(),
            genres: Vec::new(),
            authors: Vec::new(),
            meta: ListMeta::default(),
            search: String::new(),
            genre: String::new(),
            author: String::new(),
            modals: ModalSlots::default(),
            notices: Vec::new(),
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Initial load: unfiltered list and both option lists, fetched concurrently.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let all = ListQuery::all();
        let (listed, genres, authors) = tokio::try_join!(
            self.client.list_books(&all),
            self.client.genres(),
            self.client.authors(),
        )?;

        self.apply_list(listed);
        self.genres = genres;
        self.authors = authors;
        Ok(())
    }

    /// New search text; the request carries only the search term.
    pub async fn set_search(&mut self, text: impl Into<String>) -> Result<(), ClientError> {
        self.search = text.into();
        self.fetch_books(ListQuery::search(self.search.clone())).await
    }

    /// New genre selection; an empty value means all genres.
    pub async fn set_genre(&mut self, genre: impl Into<String>) -> Result<(), ClientError> {
        self.genre = genre.into();
        self.fetch_books(ListQuery::genre(self.genre.clone())).await
    }

    /// New author selection; an empty value means all authors.
    pub async fn set_author(&mut self, author: impl Into<String>) -> Result<(), ClientError> {
        self.author = author.into();
        self.fetch_books(ListQuery::author(self.author.clone())).await
    }

    pub fn open_add(&mut self) {
        self.modals.add = true;
    }

    pub fn close_add(&mut self) {
        self.modals.add = false;
    }

    pub fn open_edit(&mut self, book: Book) {
        self.modals.edit = Some(book);
    }

    pub fn close_edit(&mut self) {
        self.modals.edit = None;
    }

    pub fn open_delete(&mut self, book: Book) {
        self.modals.delete = Some(book);
    }

    pub fn close_delete(&mut self) {
        self.modals.delete = None;
    }

    /// Submits the add form. On success the modal closes and the catalog reloads.
    pub async fn submit_add(&mut self, form: &BookForm) -> Result<Book, ClientError> {
        let outcome = match form.to_draft() {
            Ok(draft) => self.client.add_book(&draft).await,
            Err(err) => Err(err.into()),
        };

        match outcome {
            Ok(book) => {
                self.notices.push(Notice::success("Book added successfully!"));
                self.close_add();
                self.reload().await;
                Ok(book)
            }
            Err(err) => {
                error!(error = %err, "Error adding book");
                self.notices.push(Notice::error("Error adding book"));
                Err(err)
            }
        }
    }

    /// Submits the edit form for the book in the edit modal.
    ///
    /// Returns `Ok(None)` when no edit modal is open.
    pub async fn submit_edit(&mut self, form: &BookForm) -> Result<Option<Book>, ClientError> {
        let Some(id) = self.modals.edit.as_ref().map(|book| book.id.clone()) else {
            return Ok(None);
        };

        let outcome = match form.to_patch() {
            Ok(patch) => self.client.update_book(&id, &patch).await,
            Err(err) => Err(err.into()),
        };

        match outcome {
            Ok(book) => {
                self.notices.push(Notice::success("Book updated successfully!"));
                self.close_edit();
                self.reload().await;
                Ok(Some(book))
            }
            Err(err) => {
                error!(book_id = %id, error = %err, "Error updating book");
                self.notices.push(Notice::error("Error updating book"));
                Err(err)
            }
        }
    }

    /// Deletes the book in the delete modal.
    ///
    /// Returns `Ok(false)` when no delete modal is open.
    pub async fn confirm_delete(&mut self) -> Result<bool, ClientError> {
        let Some(id) = self.modals.delete.as_ref().map(|book| book.id.clone()) else {
            return Ok(false);
        };

        match self.client.delete_book(&id).await {
            Ok(confirmation) => {
                self.notices.push(Notice::success(&confirmation.message));
                self.close_delete();
                self.reload().await;
                Ok(true)
            }
            Err(err) => {
                error!(book_id = %id, error = %err, "Error deleting book");
                self.notices.push(Notice::error("Error deleting book"));
                Err(err)
            }
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hands pending notices to the caller, leaving none behind.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    async fn fetch_books(&mut self, query: ListQuery) -> Result<(), ClientError> {
        debug!(?query, "fetching books");
        match self.client.list_books(&query).await {
            Ok(listed) => {
                self.apply_list(listed);
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Error fetching books");
                Err(err)
            }
        }
    }

    async fn fetch_filters(&mut self) -> Result<(), ClientError> {
        match tokio::try_join!(self.client.genres(), self.client.authors()) {
            Ok((genres, authors)) => {
                self.genres = genres;
                self.authors = authors;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Error fetching filters");
                Err(err)
            }
        }
    }

    /// Refetch after a confirmed change; failures are logged only.
    async fn reload(&mut self) {
        let _ = self.fetch_books(ListQuery::all()).await;
        let _ = self.fetch_filters().await;
    }

    fn apply_list(&mut self, listed: ListResponse) {
        self.books = listed.books;
        self.meta = listed.meta;
    }
}
