use std::fmt;

use thiserror::Error;

/// One rule broken by one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every rule a candidate book breaks, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Names of the offending fields, in report order
    pub fn fields(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|v| v.field.to_string())
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Failures of the book store
#[derive(Error, Debug)]
pub enum BookStoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Book not found")]
    NotFound,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<bookstore_db::DbError> for BookStoreError {
    fn from(err: bookstore_db::DbError) -> Self {
        BookStoreError::Unexpected(err.into())
    }
}

impl From<BookStoreError> for bookstore_http::error::AppError {
    fn from(err: BookStoreError) -> Self {
        use bookstore_http::error::AppError;

        match err {
            BookStoreError::Validation(validation) => {
                AppError::validation(validation.fields(), validation.to_string())
            }
            BookStoreError::NotFound => AppError::not_found("Book not found"),
            BookStoreError::Unexpected(e) => AppError::Internal(e),
        }
    }
}
