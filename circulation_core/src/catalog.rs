//! Book catalog: the store owning book records and copy availability.
//!
//! Replaces ambient global state with an explicit store injected into the
//! operations that need it; the ledger is the only other component that
//! mutates availability (through [`crate::Ledger`]).

use crate::{BookUpdate, Error, Result};
use crate::types::Book;
use std::collections::BTreeMap;

/// Id-keyed book store
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    books: BTreeMap<String, Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new book with all copies available.
    ///
    /// Fails with `DuplicateKey` if the id is taken and `InvalidArgument`
    /// if `total_copies` is zero.
    pub fn add_book(
        &mut self,
        id: &str,
        title: &str,
        author: &str,
        category: &str,
        total_copies: u32,
    ) -> Result<&Book> {
        if total_copies < 1 {
            return Err(Error::InvalidArgument(
                "total copies must be at least 1".into(),
            ));
        }
        if self.books.contains_key(id) {
            return Err(Error::DuplicateKey(format!("book '{}'", id)));
        }

        let book = Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            total_copies,
            available_copies: total_copies,
        };
        tracing::debug!(book_id = %id, total_copies, "book added to catalog");

        Ok(self.books.entry(id.to_string()).or_insert(book))
    }

    /// Apply a partial update to an existing book.
    ///
    /// Reducing `total_copies` below the number of currently issued copies
    /// fails with `InvalidOperation` and leaves the book untouched.
    /// Otherwise `available_copies` moves by the same delta as
    /// `total_copies`, so the issued count is preserved.
    pub fn update_book(&mut self, id: &str, update: BookUpdate) -> Result<&Book> {
        let book = self
            .books
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("book '{}'", id)))?;

        if let Some(new_total) = update.total_copies {
            let issued = book.issued_copies();
            if new_total < issued {
                return Err(Error::InvalidOperation(format!(
                    "cannot reduce total copies of book '{}' to {} while {} are issued",
                    id, new_total, issued
                )));
            }
        }

        if let Some(title) = update.title {
            book.title = title;
        }
        if let Some(author) = update.author {
            book.author = author;
        }
        if let Some(category) = update.category {
            book.category = category;
        }
        if let Some(new_total) = update.total_copies {
            book.available_copies = new_total - book.issued_copies();
            book.total_copies = new_total;
        }

        tracing::debug!(book_id = %id, "book updated");
        Ok(book)
    }

    /// Look up a book by id
    pub fn find(&self, id: &str) -> Result<&Book> {
        self.books
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("book '{}'", id)))
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Book> {
        self.books.get_mut(id)
    }

    /// Lazy case-insensitive keyword search over title, author, and category.
    ///
    /// An empty (or all-whitespace) keyword is rejected with
    /// `InvalidArgument` rather than matching everything.
    pub fn search<'a>(
        &'a self,
        keyword: &str,
    ) -> Result<impl Iterator<Item = &'a Book> + 'a> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Err(Error::InvalidArgument("search keyword is empty".into()));
        }

        Ok(self.books.values().filter(move |b| {
            b.title.to_lowercase().contains(&needle)
                || b.author.to_lowercase().contains(&needle)
                || b.category.to_lowercase().contains(&needle)
        }))
    }

    /// All books in id order
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
