//! Free-text matching over title, author and genre, plus filter evaluation.
//!
//! Query syntax: whitespace separated terms are OR-ed, `"quoted phrases"` are
//! all required (terms then only add to the score), and `-term` excludes.
//! Matching is case-insensitive substring matching.

use super::models::{Book, BookFilter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    terms: Vec<String>,
    phrases: Vec<String>,
    excluded: Vec<String>,
}

impl TextQuery {
    pub fn parse(raw: &str) -> Self {
        let mut query = TextQuery::default();

        // Even-numbered segments sit outside quotes, odd-numbered inside.
        for (i, segment) in raw.split('"').enumerate() {
            if i % 2 == 1 {
                let phrase = segment.trim().to_lowercase();
                if !phrase.is_empty() {
                    query.phrases.push(phrase);
                }
                continue;
            }

            for word in segment.split_whitespace() {
                let word = word.to_lowercase();
                if let Some(negated) = word.strip_prefix('-') {
                    if !negated.is_empty() {
                        query.excluded.push(negated.to_string());
                    }
                    continue;
                }
                query.terms.push(word);
            }
        }

        query
    }

    /// True when nothing could ever match
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.phrases.is_empty()
    }

    /// Relevance of `book`, or `None` if it does not match.
    pub fn score(&self, book: &Book) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let haystacks = [
            book.title.to_lowercase(),
            book.author.to_lowercase(),
            book.genre.to_lowercase(),
        ];
        let occurrences = |needle: &str| -> usize {
            haystacks
                .iter()
                .map(|field| field.matches(needle).count())
                .sum()
        };

        if self.excluded.iter().any(|term| occurrences(term) > 0) {
            return None;
        }

        let mut score = 0;
        for phrase in &self.phrases {
            let hits = occurrences(phrase);
            if hits == 0 {
                return None;
            }
            score += hits;
        }

        let term_hits: usize = self.terms.iter().map(|term| occurrences(term)).sum();
        if self.phrases.is_empty() && term_hits == 0 {
            return None;
        }

        Some(score + term_hits)
    }

    /// Matching books, best first; ties keep their input order.
    pub fn rank(&self, books: Vec<Book>) -> Vec<Book> {
        let mut scored: Vec<(usize, Book)> = books
            .into_iter()
            .filter_map(|book| self.score(&book).map(|score| (score, book)))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, book)| book).collect()
    }
}

impl BookFilter {
    /// Apply the filter to books given in insertion order.
    pub fn select(&self, books: Vec<Book>) -> Vec<Book> {
        match self {
            BookFilter::All => books,
            BookFilter::Text(raw) => TextQuery::parse(raw).rank(books),
            BookFilter::Genre(genre) => books.into_iter().filter(|b| &b.genre == genre).collect(),
            BookFilter::Author(author) => {
                books.into_iter().filter(|b| &b.author == author).collect()
            }
            BookFilter::Stock(stock) => books.into_iter().filter(|b| b.stock == *stock).collect(),
        }
    }
}
