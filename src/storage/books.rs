use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::{BookRecord, BookUpdate};
use super::tables::*;

impl Database {
    // ========================================================================
    // Book operations
    // ========================================================================

    /// Store a book record and update the owner index
    pub fn put_book(&self, book: &BookRecord) -> Result<(), DatabaseError> {
        debug_assert!(!book.id.is_empty(), "book id must not be empty");
        debug_assert!(!book.owner_id.is_empty(), "book owner must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(BOOKS)?;
            let data = rmp_serde::to_vec_named(book)?;
            table.insert(book.id.as_str(), data.as_slice())?;

            // Maintain owner index
            let mut owner_table = write_txn.open_table(OWNER_BOOKS)?;
            let mut book_ids: Vec<String> = owner_table
                .get(book.owner_id.as_str())?
                .map(|v| rmp_serde::from_slice(v.value()).unwrap_or_default())
                .unwrap_or_default();

            if !book_ids.contains(&book.id) {
                book_ids.push(book.id.clone());
                let index_data = rmp_serde::to_vec_named(&book_ids)?;
                owner_table.insert(book.owner_id.as_str(), index_data.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a book by its UUID
    pub fn get_book(&self, id: &str) -> Result<Option<BookRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(BOOKS)?;

        match table.get(id)? {
            Some(data) => {
                let book: BookRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(book))
            }
            None => Ok(None),
        }
    }

    /// Get all books
    pub fn get_all_books(&self) -> Result<Vec<BookRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(BOOKS)?;

        let mut books = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let book: BookRecord = rmp_serde::from_slice(value.value())?;
            books.push(book);
        }

        Ok(books)
    }

    /// Get all books created by an owner, via the owner index
    pub fn get_books_by_owner(&self, owner_id: &str) -> Result<Vec<BookRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let owner_table = read_txn.open_table(OWNER_BOOKS)?;
        let books_table = read_txn.open_table(BOOKS)?;

        let book_ids: Vec<String> = match owner_table.get(owner_id)? {
            Some(data) => rmp_serde::from_slice(data.value())?,
            None => return Ok(Vec::new()),
        };

        let mut books = Vec::new();
        for book_id in book_ids {
            if let Some(data) = books_table.get(book_id.as_str())? {
                let book: BookRecord = rmp_serde::from_slice(data.value())?;
                books.push(book);
            }
        }

        Ok(books)
    }

    /// Overwrite a book's mutable fields. The owner is never changed.
    /// Returns the updated record, or `None` if the id does not resolve.
    pub fn update_book(
        &self,
        id: &str,
        update: &BookUpdate,
    ) -> Result<Option<BookRecord>, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(BOOKS)?;
            let result = match table.get(id)? {
                Some(data) => {
                    let book: BookRecord = rmp_serde::from_slice(data.value())?;
                    Some(book)
                }
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut book) => {
                book.title = update.title.clone();
                book.author = update.author.clone();
                book.description = update.description.clone();
                book.category_id = update.category_id.clone();
                book.quantity = update.quantity;
                if let Some(ref file_path) = update.file_path {
                    book.file_path = Some(file_path.clone());
                }
                if let Some(ref cover_path) = update.cover_path {
                    book.cover_path = Some(cover_path.clone());
                }
                book.updated_at = chrono::Utc::now();

                let serialized = rmp_serde::to_vec_named(&book)?;
                let mut table = write_txn.open_table(BOOKS)?;
                table.insert(id, serialized.as_slice())?;
                Some(book)
            }
            None => None,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a book by its UUID and clean up the owner index
    pub fn delete_book(&self, id: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        // Get the owner for index cleanup
        let owner_id: Option<String> = {
            let table = write_txn.open_table(BOOKS)?;
            let result = match table.get(id)? {
                Some(data) => {
                    let book: BookRecord = rmp_serde::from_slice(data.value())?;
                    Some(book.owner_id)
                }
                None => None,
            };
            result
        };

        let deleted = match owner_id {
            Some(owner_id) => {
                {
                    let mut table = write_txn.open_table(BOOKS)?;
                    table.remove(id)?;
                }

                let book_ids: Option<Vec<String>> = {
                    let owner_table = write_txn.open_table(OWNER_BOOKS)?;
                    let result = owner_table.get(owner_id.as_str())?;
                    match result {
                        Some(data) => Some(rmp_serde::from_slice(data.value())?),
                        None => None,
                    }
                };

                if let Some(mut ids) = book_ids {
                    ids.retain(|bid| bid != id);
                    let mut owner_table = write_txn.open_table(OWNER_BOOKS)?;
                    if ids.is_empty() {
                        owner_table.remove(owner_id.as_str())?;
                    } else {
                        let new_data = rmp_serde::to_vec_named(&ids)?;
                        owner_table.insert(owner_id.as_str(), new_data.as_slice())?;
                    }
                }
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(deleted)
    }
}
