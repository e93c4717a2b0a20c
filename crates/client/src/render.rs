//! Terminal rendering of the catalog.

use tabled::{
    settings::{object::Rows, Color, Style},
    Table, Tabled,
};

use crate::preferences::Theme;
use crate::types::{Book, ListMeta};

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Genre")]
    genre: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: u64,
    #[tabled(rename = "Year")]
    year: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            price: format_price(book.price),
            stock: book.stock,
            year: book
                .published_year
                .map(|year| year.to_string())
                .unwrap_or_default(),
            id: book.id.clone(),
        }
    }
}

pub fn stats_line(meta: &ListMeta) -> String {
    format!(
        "Total Books: {} | Out of Stock: {}",
        meta.total, meta.out_of_stock
    )
}

/// Stats line followed by the book table.
///
/// With a theme, the header is emphasised and out-of-stock rows are
/// highlighted; `None` renders plain text.
pub fn render_catalog(books: &[Book], meta: &ListMeta, theme: Option<Theme>) -> String {
    let stats = stats_line(meta);
    if books.is_empty() {
        return format!("{stats}\n\nNo books found");
    }

    let mut table = Table::new(books.iter().map(BookRow::from));
    table.with(Style::modern_rounded());

    if let Some(theme) = theme {
        let (header, sold_out) = match theme {
            Theme::Light => (Color::BOLD, Color::FG_RED),
            Theme::Dark => (Color::FG_BRIGHT_WHITE, Color::FG_BRIGHT_RED),
        };
        table.modify(Rows::first(), header);
        for (idx, book) in books.iter().enumerate() {
            if book.stock == 0 {
                table.modify(Rows::new(idx + 1..idx + 2), sold_out.clone());
            }
        }
    }

    format!("{stats}\n\n{table}")
}

/// Details of a single book as `field: value` lines.
pub fn render_book(book: &Book) -> String {
    let row = BookRow::from(book);
    let created = book
        .created_at
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();

    [
        ("ID", row.id),
        ("Title", row.title),
        ("Author", row.author),
        ("Genre", row.genre),
        ("Price", row.price),
        ("Stock", row.stock.to_string()),
        ("Published Year", row.year),
        ("Created", created),
    ]
    .iter()
    .map(|(field, value)| format!("{field:>14}: {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Rupee amount with two decimals and Indian digit grouping (`₹12,34,567.50`).
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, tail) = whole.split_at(whole.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            groups.push(right);
            rest = left;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{tail}", groups.join(","))
    };

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{sign}₹{grouped}.{cents}")
}
