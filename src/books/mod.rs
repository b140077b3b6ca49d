//! Core book lifecycle operations: validate, mutate blobs, persist records.
//!
//! These functions are independent of the HTTP layer. The acting principal is
//! always an explicit argument, and results carry the record(s) plus enough
//! structure for the presentation layer to render a status message.

pub mod validate;

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;

use crate::config::Config;
use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::storage::models::{BookRecord, BookUpdate, CategoryRecord};
use crate::storage::{Database, DatabaseError};

use validate::{validate_cover, validate_form, validate_pdf, BookForm, FieldError, FieldReason};

/// Object store namespace for uploaded PDFs
pub const PDF_NAMESPACE: &str = "pdfs";
/// Object store namespace for uploaded cover images
pub const COVER_NAMESPACE: &str = "covers";

#[derive(Debug, Error)]
pub enum BookError {
    #[error("Book not found")]
    NotFound,
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("PDF file not found")]
    FileMissing,
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Storage(#[from] ObjectStoreError),
}

/// An uploaded file as it arrives from a multipart request.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FileUpload {
    /// Effective MIME type: the declared Content-Type when meaningful,
    /// otherwise guessed from the filename.
    pub fn mime_type(&self) -> Option<String> {
        self.content_type
            .clone()
            .filter(|ct| ct != "application/octet-stream")
            .or_else(|| {
                self.file_name
                    .as_deref()
                    .and_then(|n| mime_guess::from_path(n).first())
                    .map(|m| m.to_string())
            })
    }
}

/// Upload size limits, taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_pdf_size: u64,
    pub max_cover_size: u64,
}

impl From<&Config> for UploadLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_pdf_size: config.max_pdf_size,
            max_cover_size: config.max_cover_size,
        }
    }
}

/// Result of the list operation: every book, plus the caller's own.
#[derive(Debug)]
pub struct BookListing {
    pub books: Vec<BookRecord>,
    pub owned: Vec<BookRecord>,
}

/// List all books, plus the subset owned by the principal (empty when the
/// request is unauthenticated).
pub fn list_books(db: &Database, principal: Option<&str>) -> Result<BookListing, BookError> {
    let books = db.get_all_books()?;
    let owned = match principal {
        Some(owner_id) => db.get_books_by_owner(owner_id)?,
        None => Vec::new(),
    };
    Ok(BookListing { books, owned })
}

/// Create a book. Both files are required; validation must pass before any
/// blob is written. On success the record references freshly minted blob keys
/// and the principal as owner.
pub async fn create_book(
    db: &Database,
    store: &dyn ObjectStore,
    principal: &str,
    form: BookForm,
    pdf: Option<FileUpload>,
    cover: Option<FileUpload>,
    limits: &UploadLimits,
) -> Result<BookRecord, BookError> {
    let mut errors = Vec::new();

    let fields = match validate_form(db, &form) {
        Ok(fields) => Some(fields),
        Err(BookError::Validation(form_errors)) => {
            errors.extend(form_errors);
            None
        }
        Err(e) => return Err(e),
    };

    let pdf = match pdf {
        Some(upload) => {
            if let Some(err) = validate_pdf(&upload, limits) {
                errors.push(err);
            }
            Some(upload)
        }
        None => {
            errors.push(FieldError {
                field: "pdf",
                reason: FieldReason::Required,
            });
            None
        }
    };

    let cover = match cover {
        Some(upload) => {
            if let Some(err) = validate_cover(&upload, limits) {
                errors.push(err);
            }
            Some(upload)
        }
        None => {
            errors.push(FieldError {
                field: "cover",
                reason: FieldReason::Required,
            });
            None
        }
    };

    if !errors.is_empty() {
        return Err(BookError::Validation(errors));
    }

    // Validation passed, so all three are present.
    let (fields, pdf, cover) = match (fields, pdf, cover) {
        (Some(f), Some(p), Some(c)) => (f, p, c),
        _ => unreachable!("validated inputs missing without a field error"),
    };

    let file_path = pdf_key();
    let cover_path = cover_key(&cover);

    store.put(&file_path, pdf.data).await?;
    if let Err(e) = store.put(&cover_path, cover.data).await {
        // Best-effort cleanup of the already-stored PDF
        let _ = store.delete(&file_path).await;
        return Err(e.into());
    }

    let now = Utc::now();
    let book = BookRecord {
        id: uuid::Uuid::new_v4().to_string(),
        title: fields.title,
        author: fields.author,
        description: fields.description,
        category_id: fields.category_id,
        quantity: fields.quantity,
        file_path: Some(file_path.clone()),
        cover_path: Some(cover_path.clone()),
        owner_id: principal.to_string(),
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = db.put_book(&book) {
        // Best-effort cleanup of both uploaded blobs
        let _ = store.delete(&file_path).await;
        let _ = store.delete(&cover_path).await;
        return Err(e.into());
    }

    tracing::debug!(book_id = %book.id, owner_id = %book.owner_id, "Created book");
    Ok(book)
}

/// Fetch a single book by id.
pub fn get_book(db: &Database, id: &str) -> Result<BookRecord, BookError> {
    db.get_book(id)?.ok_or(BookError::NotFound)
}

/// Load the data needed by the edit form: the book and the full category set.
pub fn edit_book(
    db: &Database,
    id: &str,
) -> Result<(BookRecord, Vec<CategoryRecord>), BookError> {
    let book = get_book(db, id)?;
    let categories = db.get_all_categories()?;
    Ok((book, categories))
}

/// Update a book. The id must resolve before any validation side effect.
/// File fields are optional; omission preserves the stored key. A supplied
/// file replaces the old blob: the new blob is stored first, the record
/// updated, and only then is the old blob deleted, so a failure mid-way never
/// loses the previous upload.
pub async fn update_book(
    db: &Database,
    store: &dyn ObjectStore,
    id: &str,
    form: BookForm,
    pdf: Option<FileUpload>,
    cover: Option<FileUpload>,
    limits: &UploadLimits,
) -> Result<BookRecord, BookError> {
    let existing = get_book(db, id)?;

    let mut errors = Vec::new();
    let fields = match validate_form(db, &form) {
        Ok(fields) => Some(fields),
        Err(BookError::Validation(form_errors)) => {
            errors.extend(form_errors);
            None
        }
        Err(e) => return Err(e),
    };

    if let Some(ref upload) = pdf {
        if let Some(err) = validate_pdf(upload, limits) {
            errors.push(err);
        }
    }
    if let Some(ref upload) = cover {
        if let Some(err) = validate_cover(upload, limits) {
            errors.push(err);
        }
    }

    if !errors.is_empty() {
        return Err(BookError::Validation(errors));
    }
    let fields = match fields {
        Some(f) => f,
        None => unreachable!("validated form missing without a field error"),
    };

    // Store replacement blobs before touching the record or the old blobs.
    let new_file_path = match pdf {
        Some(upload) => {
            let key = pdf_key();
            store.put(&key, upload.data).await?;
            Some(key)
        }
        None => None,
    };

    let new_cover_path = match cover {
        Some(upload) => {
            let key = cover_key(&upload);
            if let Err(e) = store.put(&key, upload.data).await {
                if let Some(ref key) = new_file_path {
                    let _ = store.delete(key).await;
                }
                return Err(e.into());
            }
            Some(key)
        }
        None => None,
    };

    let update = BookUpdate {
        title: fields.title,
        author: fields.author,
        description: fields.description,
        category_id: fields.category_id,
        quantity: fields.quantity,
        file_path: new_file_path.clone(),
        cover_path: new_cover_path.clone(),
    };

    let result = match db.update_book(id, &update) {
        Ok(Some(book)) => Ok(book),
        Ok(None) => Err(BookError::NotFound),
        Err(e) => Err(BookError::Database(e)),
    };
    let updated = match result {
        Ok(book) => book,
        Err(e) => {
            // Record write failed after the new blobs landed; drop them.
            if let Some(ref key) = new_file_path {
                let _ = store.delete(key).await;
            }
            if let Some(ref key) = new_cover_path {
                let _ = store.delete(key).await;
            }
            return Err(e);
        }
    };

    // The record now points at the new blobs; retire the replaced ones.
    if new_file_path.is_some() {
        if let Some(ref old_key) = existing.file_path {
            if let Err(e) = store.delete(old_key).await {
                tracing::warn!(book_id = %id, key = %old_key, error = %e, "Failed to delete replaced PDF blob");
            }
        }
    }
    if new_cover_path.is_some() {
        if let Some(ref old_key) = existing.cover_path {
            if let Err(e) = store.delete(old_key).await {
                tracing::warn!(book_id = %id, key = %old_key, error = %e, "Failed to delete replaced cover blob");
            }
        }
    }

    tracing::debug!(book_id = %id, "Updated book");
    Ok(updated)
}

/// Delete a book and its blobs. Blob deletion is best-effort: a blob that was
/// already removed externally never blocks deleting the record.
pub async fn delete_book(
    db: &Database,
    store: &dyn ObjectStore,
    id: &str,
) -> Result<(), BookError> {
    let book = get_book(db, id)?;

    if let Some(ref key) = book.file_path {
        if let Err(e) = store.delete(key).await {
            tracing::warn!(book_id = %id, key = %key, error = %e, "Failed to delete PDF blob");
        }
    }
    if let Some(ref key) = book.cover_path {
        if let Err(e) = store.delete(key).await {
            tracing::warn!(book_id = %id, key = %key, error = %e, "Failed to delete cover blob");
        }
    }

    if !db.delete_book(id)? {
        return Err(BookError::NotFound);
    }

    tracing::debug!(book_id = %id, "Deleted book");
    Ok(())
}

/// Load a book's PDF bytes for streaming. A record without a PDF, or a key
/// whose blob has gone missing, is a user-visible "file not found" -- never a
/// fault.
pub async fn load_pdf(
    db: &Database,
    store: &dyn ObjectStore,
    id: &str,
) -> Result<Bytes, BookError> {
    let book = get_book(db, id)?;

    let key = book.file_path.as_deref().ok_or(BookError::FileMissing)?;

    match store.get(key).await {
        Ok(data) => Ok(data),
        Err(ObjectStoreError::NotFound(_)) => Err(BookError::FileMissing),
        Err(e) => Err(e.into()),
    }
}

fn pdf_key() -> String {
    format!("{PDF_NAMESPACE}/{}.pdf", uuid::Uuid::new_v4())
}

fn cover_key(upload: &FileUpload) -> String {
    let ext = match upload.mime_type().as_deref() {
        Some("image/png") => "png",
        _ => "jpg",
    };
    format!("{COVER_NAMESPACE}/{}.{ext}", uuid::Uuid::new_v4())
}
