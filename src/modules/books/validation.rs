//! Write-time rules every stored book satisfies.

use time::OffsetDateTime;

use super::errors::{FieldViolation, ValidationError};
use super::models::BookDraft;

/// The checked, typed content of a book, minus store-assigned fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
    pub stock: u64,
    pub published_year: Option<i32>,
}

/// Current calendar year in UTC, the upper bound for `publishedYear`
pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// Check `draft` against every rule, collecting all violations.
pub fn validate(draft: &BookDraft, current_year: i32) -> Result<ValidBook, ValidationError> {
    let mut violations = Vec::new();

    let title = required_text("title", draft.title.as_deref(), &mut violations);
    let author = required_text("author", draft.author.as_deref(), &mut violations);
    let genre = required_text("genre", draft.genre.as_deref(), &mut violations);

    let price = match draft.price {
        None => {
            violations.push(violation("price", "is required"));
            None
        }
        Some(p) if !p.is_finite() => {
            violations.push(violation("price", "must be a finite number"));
            None
        }
        Some(p) if p < 0.0 => {
            violations.push(violation(
                "price",
                format!("must be greater than or equal to 0 (got {p})"),
            ));
            None
        }
        Some(p) => Some(p),
    };

    let stock = match draft.stock {
        None => Some(0),
        Some(s) => non_negative_integer("stock", s, &mut violations),
    };

    let published_year = match draft.published_year {
        None => Some(None),
        Some(y) if !y.is_finite() || y.fract() != 0.0 => {
            violations.push(violation("publishedYear", "must be a whole number"));
            None
        }
        Some(y) if y < 0.0 || y > f64::from(current_year) => {
            violations.push(violation(
                "publishedYear",
                format!("must be between 0 and {current_year} (got {y})"),
            ));
            None
        }
        Some(y) => Some(Some(y as i32)),
    };

    match (title, author, genre, price, stock, published_year) {
        (Some(title), Some(author), Some(genre), Some(price), Some(stock), Some(published_year))
            if violations.is_empty() =>
        {
            Ok(ValidBook {
                title,
                author,
                genre,
                price,
                stock,
                published_year,
            })
        }
        _ => Err(ValidationError { violations }),
    }
}

fn violation(field: &'static str, message: impl Into<String>) -> FieldViolation {
    FieldViolation {
        field,
        message: message.into(),
    }
}

fn required_text(
    field: &'static str,
    value: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match value {
        None => {
            violations.push(violation(field, "is required"));
            None
        }
        Some(v) if v.trim().is_empty() => {
            violations.push(violation(field, "must not be empty"));
            None
        }
        Some(v) => Some(v.to_string()),
    }
}

fn non_negative_integer(
    field: &'static str,
    value: f64,
    violations: &mut Vec<FieldViolation>,
) -> Option<u64> {
    if !value.is_finite() || value.fract() != 0.0 {
        violations.push(violation(field, "must be a whole number"));
        None
    } else if value < 0.0 {
        violations.push(violation(
            field,
            format!("must be greater than or equal to 0 (got {value})"),
        ));
        None
    } else if value >= u64::MAX as f64 {
        // 2^64 is the nearest f64; anything from there on would saturate
        violations.push(violation(
            field,
            format!("must be less than {} (got {value})", u64::MAX),
        ));
        None
    } else {
        Some(value as u64)
    }
}
