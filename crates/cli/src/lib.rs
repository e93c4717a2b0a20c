//! `bookstore` command-line client.
//!
//! The API root comes from `--api-url` / `BOOKSTORE_API_URL` when given,
//! otherwise it is derived from `--host` the way the browser client derives
//! it from the page hostname.

use std::path::PathBuf;

use bookstore_client::{resolve_api_url, BookForm};
use clap::{Args, Parser, Subcommand};

pub mod commands;

#[derive(Debug, Parser)]
#[command(name = "bookstore")]
#[command(author, version, about = "Browse and manage the book inventory", long_about = None)]
pub struct Cli {
    /// API root, e.g. `http://localhost:5000/api`
    #[arg(long, env = "BOOKSTORE_API_URL")]
    pub api_url: Option<String>,

    /// Hostname the API URL is derived from when no URL is given
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Preferences file holding the theme choice
    #[arg(long, env = "BOOKSTORE_PREFS", default_value = ".bookstore-preferences.json")]
    pub prefs: PathBuf,

    /// Print tables without colours
    #[arg(long)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn api_url(&self) -> String {
        match &self.api_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => resolve_api_url(&self.host),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List books with the inventory stats
    List(ListArgs),
    /// Show one book
    Show {
        id: String,
    },
    /// List the distinct genres
    Genres,
    /// List the distinct authors
    Authors,
    /// Add a book
    Add(AddArgs),
    /// Edit a book; only the given fields change
    Edit(EditArgs),
    /// Delete a book
    Delete {
        id: String,
    },
    /// Show or toggle the colour theme
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

/// At most one criterion, like the list screen's search box and selectors.
#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct ListArgs {
    /// Free-text search over title, author and genre
    #[arg(long, short)]
    pub search: Option<String>,

    #[arg(long, short)]
    pub genre: Option<String>,

    #[arg(long, short)]
    pub author: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    #[arg(long)]
    pub genre: String,

    #[arg(long)]
    pub price: String,

    /// Defaults to 0
    #[arg(long, default_value = "")]
    pub stock: String,

    /// Publication year; omitted when empty
    #[arg(long, default_value = "")]
    pub year: String,
}

impl AddArgs {
    pub fn to_form(&self) -> BookForm {
        BookForm {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            price: self.price.clone(),
            stock: self.stock.clone(),
            published_year: self.year.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub stock: Option<String>,

    /// Publication year; an empty value clears it
    #[arg(long)]
    pub year: Option<String>,
}

impl EditArgs {
    /// Overlays the given fields on a form prefilled from the stored book.
    pub fn apply(&self, form: &mut BookForm) {
        let overrides = [
            (&self.title, &mut form.title),
            (&self.author, &mut form.author),
            (&self.genre, &mut form.genre),
            (&self.price, &mut form.price),
            (&self.stock, &mut form.stock),
            (&self.year, &mut form.published_year),
        ];
        for (given, field) in overrides {
            if let Some(value) = given {
                field.clone_from(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn api_url_falls_back_to_the_host() {
        let cli = Cli::parse_from(["bookstore", "--host", "demo-3000.app.github.dev", "genres"]);
        assert_eq!(cli.api_url(), "https://demo-5000.app.github.dev/api");

        let cli = Cli::parse_from(["bookstore", "--api-url", "http://books:8080/api", "genres"]);
        assert_eq!(cli.api_url(), "http://books:8080/api");
    }

    #[test]
    fn list_accepts_a_single_criterion() {
        let cli = Cli::parse_from(["bookstore", "list", "--genre", "Poetry"]);
        match cli.command {
            Commands::List(args) => assert_eq!(args.genre.as_deref(), Some("Poetry")),
            other => panic!("unexpected command {other:?}"),
        }

        let err = Cli::try_parse_from(["bookstore", "list", "--genre", "Poetry", "--search", "x"]);
        assert!(err.is_err());
    }

    #[test]
    fn edit_overrides_only_given_fields() {
        let cli = Cli::parse_from(["bookstore", "edit", "b1", "--stock", "7", "--year", ""]);
        let Commands::Edit(args) = cli.command else {
            panic!("expected edit");
        };

        let mut form = BookForm {
            title: "Emma".into(),
            price: "5".into(),
            stock: "1".into(),
            published_year: "1815".into(),
            ..BookForm::default()
        };
        args.apply(&mut form);

        assert_eq!(form.title, "Emma");
        assert_eq!(form.price, "5");
        assert_eq!(form.stock, "7");
        assert_eq!(form.published_year, "");
    }
}
