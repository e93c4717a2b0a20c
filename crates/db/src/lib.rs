//! Embedded document store for the bookstore service.
//!
//! A [`Database`] wraps one sled instance; each [`Collection`] is a sled tree
//! holding JSON documents keyed by their string id.

mod collection;
mod error;
mod module;

use std::sync::Arc;

use bookstore_kernel::settings::DatabaseSettings;

pub use collection::Collection;
pub use error::DbError;
pub use module::DbModule;

/// Long-lived handle on the document store; cheap to clone.
#[derive(Clone)]
pub struct Database {
    db: Arc<sled::Db>,
}

impl Database {
    /// Open the store described by `settings`.
    pub fn open(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let config = if settings.temporary {
            sled::Config::new().temporary(true)
        } else {
            sled::Config::new().path(&settings.path)
        };

        let db = config
            .flush_every_ms(Some(settings.flush_every_ms))
            .open()?;

        tracing::info!(
            target: "bookstore-db",
            path = %settings.path.display(),
            temporary = settings.temporary,
            recovered = db.was_recovered(),
            "document store opened"
        );

        Ok(Self { db: Arc::new(db) })
    }

    /// Open a throwaway store, removed when the last handle drops.
    pub fn temporary() -> Result<Self, DbError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Open (creating if needed) the named collection.
    pub fn collection<T>(&self, name: &str) -> Result<Collection<T>, DbError> {
        let tree = self.db.open_tree(name)?;
        Ok(Collection::new(name, tree))
    }

    /// Names of the collections currently present.
    pub fn collection_names(&self) -> Vec<String> {
        self.db
            .tree_names()
            .into_iter()
            .filter(|name| &name[..] != b"__sled__default")
            .map(|name| String::from_utf8_lossy(&name).into_owned())
            .collect()
    }

    /// Write all buffered changes to disk; returns the number of bytes flushed.
    pub async fn flush(&self) -> Result<usize, DbError> {
        Ok(self.db.flush_async().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn reopening_a_path_keeps_documents() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DatabaseSettings {
            path: PathBuf::from(dir.path()),
            temporary: false,
            flush_every_ms: 100,
        };

        {
            let db = Database::open(&settings).unwrap();
            let notes = db.collection::<String>("notes").unwrap();
            notes.insert_new("a", &"first".to_string()).unwrap();
            db.flush().await.unwrap();
        }

        let db = Database::open(&settings).unwrap();
        let notes = db.collection::<String>("notes").unwrap();
        assert_eq!(notes.get("a").unwrap().as_deref(), Some("first"));
        assert!(db.collection_names().contains(&"notes".to_string()));
    }
}
