use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::DbError;

/// Typed view over one sled tree of JSON documents.
///
/// Keys iterate in byte order, so time-ordered ids (UUID v7) give insertion
/// order for free.
pub struct Collection<T> {
    name: String,
    tree: sled::Tree,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            tree: self.tree.clone(),
            _doc: PhantomData,
        }
    }
}

impl<T> Collection<T> {
    pub(crate) fn new(name: &str, tree: sled::Tree) -> Self {
        Self {
            name: name.to_string(),
            tree,
            _doc: PhantomData,
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Store a new document; fails with [`DbError::Duplicate`] if `id` is taken.
    pub fn insert_new(&self, id: &str, doc: &T) -> Result<(), DbError> {
        let bytes = serde_json::to_vec(doc)?;
        self.tree
            .compare_and_swap(id.as_bytes(), None as Option<&[u8]>, Some(bytes))?
            .map_err(|_| DbError::Duplicate(id.to_string()))
    }

    /// Fetch a document by id.
    pub fn get(&self, id: &str) -> Result<Option<T>, DbError> {
        match self.tree.get(id.as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    /// Every document paired with its id, in key order.
    pub fn entries(&self) -> Result<Vec<(String, T)>, DbError> {
        self.tree
            .iter()
            .map(|entry| {
                let (key, raw) = entry?;
                let id = std::str::from_utf8(&key)
                    .map_err(|_| DbError::Key)?
                    .to_string();
                Ok((id, serde_json::from_slice(&raw)?))
            })
            .collect()
    }

    /// Every document, in key order.
    pub fn all(&self) -> Result<Vec<T>, DbError> {
        Ok(self.entries()?.into_iter().map(|(_, doc)| doc).collect())
    }

    /// Read-modify-write one document atomically.
    ///
    /// `f` may run more than once if the document changes underneath it; the
    /// write only lands if the stored bytes are still the ones `f` saw. Returns
    /// `Ok(None)` when no document has that id (including when it vanished
    /// between attempts).
    pub fn update<E, F>(&self, id: &str, mut f: F) -> Result<Option<T>, E>
    where
        E: From<DbError>,
        F: FnMut(T) -> Result<T, E>,
    {
        loop {
            let Some(current) = self.tree.get(id.as_bytes()).map_err(DbError::from)? else {
                return Ok(None);
            };

            let doc: T = serde_json::from_slice(&current).map_err(DbError::from)?;
            let next = f(doc)?;
            let bytes = serde_json::to_vec(&next).map_err(DbError::from)?;

            let swapped = self
                .tree
                .compare_and_swap(id.as_bytes(), Some(&current), Some(bytes))
                .map_err(DbError::from)?;

            match swapped {
                Ok(()) => return Ok(Some(next)),
                Err(_) => {
                    tracing::debug!(
                        target: "bookstore-db",
                        collection = %self.name,
                        id,
                        "concurrent write detected, retrying update"
                    );
                }
            }
        }
    }

    /// Remove a document, returning it if it existed.
    pub fn remove(&self, id: &str) -> Result<Option<T>, DbError> {
        match self.tree.remove(id.as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }
}
