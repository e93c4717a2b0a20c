//! Catalog client for the bookstore API.
//!
//! [`CatalogClient`] speaks the HTTP API, [`CatalogView`] holds what a user
//! currently sees (results, filters, counts, open dialogs, notices),
//! [`BookForm`] turns raw form input into request bodies and [`Preferences`]
//! persists the theme choice.

pub mod api;
pub mod form;
pub mod preferences;
pub mod render;
pub mod types;
pub mod view;

pub use api::{resolve_api_url, CatalogClient, ClientError};
pub use form::{BookForm, FormError};
pub use preferences::{Preferences, Theme};
pub use types::{Book, BookDraft, BookPatch, ListMeta, ListQuery, ListResponse};
pub use view::{CatalogView, ModalSlots, Notice, NoticeKind};
