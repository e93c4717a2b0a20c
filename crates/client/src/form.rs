//! Add/edit form state and its coercion into request bodies.

use thiserror::Error;

use crate::types::{Book, BookDraft, BookPatch};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },
}

/// Raw text of the book form fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: String,
    pub stock: String,
    pub published_year: String,
}

impl BookForm {
    /// Form prefilled from an existing book, for editing.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            price: book.price.to_string(),
            stock: book.stock.to_string(),
            published_year: book
                .published_year
                .map(|year| year.to_string())
                .unwrap_or_default(),
        }
    }

    /// Create body; an empty year is left out.
    pub fn to_draft(&self) -> Result<BookDraft, FormError> {
        Ok(BookDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            price: number("price", &self.price)?,
            stock: number("stock", &self.stock)?,
            published_year: optional_number("publishedYear", &self.published_year)?,
        })
    }

    /// Update body carrying every field; an empty year is sent as `null`.
    pub fn to_patch(&self) -> Result<BookPatch, FormError> {
        Ok(BookPatch {
            title: Some(self.title.clone()),
            author: Some(self.author.clone()),
            genre: Some(self.genre.clone()),
            price: Some(number("price", &self.price)?),
            stock: Some(number("stock", &self.stock)?),
            published_year: Some(optional_number("publishedYear", &self.published_year)?),
        })
    }
}

/// Blank counts as zero, like an untouched numeric input.
fn number(field: &'static str, raw: &str) -> Result<f64, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    parse(field, trimmed)
}

/// Blank means unset, never zero.
fn optional_number(field: &'static str, raw: &str) -> Result<Option<f64>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse(field, trimmed).map(Some)
}

fn parse(field: &'static str, trimmed: &str) -> Result<f64, FormError> {
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FormError::NotANumber {
            field,
            value: trimmed.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn filled() -> BookForm {
        BookForm {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            genre: "Science Fiction".into(),
            price: "9.99".into(),
            stock: "3".into(),
            published_year: String::new(),
        }
    }

    #[test]
    fn numeric_fields_are_submitted_as_numbers() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.price, 9.99);
        assert_eq!(draft.stock, 3.0);
    }

    #[test]
    fn empty_year_is_unset_not_zero() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.published_year, None);
        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("publishedYear").is_none());

        let patch = filled().to_patch().unwrap();
        assert_eq!(patch.published_year, Some(None));
    }

    #[test]
    fn blank_stock_becomes_zero() {
        let form = BookForm {
            stock: "  ".into(),
            ..filled()
        };
        assert_eq!(form.to_draft().unwrap().stock, 0.0);
    }

    #[test]
    fn garbage_numbers_are_reported() {
        let form = BookForm {
            price: "ten".into(),
            ..filled()
        };
        assert_eq!(
            form.to_draft().unwrap_err(),
            FormError::NotANumber {
                field: "price",
                value: "ten".into()
            }
        );
    }

    #[test]
    fn edit_form_round_trips_a_book() {
        let book = Book {
            id: "b1".into(),
            title: "Emma".into(),
            author: "Jane Austen".into(),
            genre: "Romance".into(),
            price: 5.5,
            stock: 2,
            published_year: Some(1815),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let form = BookForm::from_book(&book);
        assert_eq!(form.published_year, "1815");

        let patch = form.to_patch().unwrap();
        assert_eq!(patch.price, Some(5.5));
        assert_eq!(patch.stock, Some(2.0));
        assert_eq!(patch.published_year, Some(Some(1815.0)));
    }
}
