use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::CategoryRecord;
use super::tables::*;

impl Database {
    // ========================================================================
    // Category operations
    // ========================================================================

    /// Store a category record
    pub fn put_category(&self, category: &CategoryRecord) -> Result<(), DatabaseError> {
        debug_assert!(!category.id.is_empty(), "category id must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(CATEGORIES)?;
            let data = rmp_serde::to_vec_named(category)?;
            table.insert(category.id.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a category by its UUID
    pub fn get_category(&self, id: &str) -> Result<Option<CategoryRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(CATEGORIES)?;

        match table.get(id)? {
            Some(data) => {
                let category: CategoryRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(category))
            }
            None => Ok(None),
        }
    }

    /// Check whether a category id resolves, for write-time validation
    pub fn category_exists(&self, id: &str) -> Result<bool, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(CATEGORIES)?;
        Ok(table.get(id)?.is_some())
    }

    /// Get all categories
    pub fn get_all_categories(&self) -> Result<Vec<CategoryRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(CATEGORIES)?;

        let mut categories = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let category: CategoryRecord = rmp_serde::from_slice(value.value())?;
            categories.push(category);
        }

        Ok(categories)
    }
}
