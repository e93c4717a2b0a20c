use thiserror::Error;

/// Failures raised by the document store.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("storage failure: {0}")]
    Storage(#[from] sled::Error),

    #[error("document codec failure: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("document key is not valid UTF-8")]
    Key,

    #[error("document '{0}' already exists")]
    Duplicate(String),
}
