//! book-manager - A book catalog API with PDF and cover image storage
//!
//! This crate provides CRUD for book records with file uploads:
//! - redb embedded database for book and category records (ACID, crash-safe)
//! - Swappable object storage for the uploaded binaries (PDF + cover image)
//! - REST API with multipart upload support

pub mod api;
pub mod books;
pub mod config;
pub mod object_store;
pub mod storage;

use std::sync::Arc;

use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub object_store: Arc<dyn object_store::ObjectStore>,
}
