//! Field-scoped validation for book form input.
//!
//! Violations are collected as structured `FieldError`s; human-readable
//! message text is produced by `Display` at the presentation boundary.

use std::fmt;

use crate::storage::{Database, DatabaseError};

use super::{BookError, FileUpload, UploadLimits};

/// A single validation failure, scoped to the offending form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: FieldReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldReason {
    /// Field was missing or empty
    Required,
    /// Value could not be parsed as a non-negative integer
    NotAnInteger,
    /// Referenced category does not exist
    UnknownCategory,
    /// Upload is not a PDF
    NotAPdf,
    /// Upload is not a jpeg/jpg/png image
    NotAnImage,
    /// Upload exceeds the size limit (bytes)
    TooLarge { limit: u64 },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FieldReason::Required => write!(f, "{} must not be empty", self.field),
            FieldReason::NotAnInteger => {
                write!(f, "{} must be a non-negative integer", self.field)
            }
            FieldReason::UnknownCategory => write!(f, "{} does not exist", self.field),
            FieldReason::NotAPdf => write!(f, "{} must be a PDF file", self.field),
            FieldReason::NotAnImage => {
                write!(f, "{} must be a jpeg, jpg, or png image", self.field)
            }
            FieldReason::TooLarge { limit } => {
                write!(f, "{} exceeds the maximum size of {} bytes", self.field, limit)
            }
        }
    }
}

/// Raw text fields as they arrive from the form, before validation.
#[derive(Debug, Clone, Default)]
pub struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub quantity: Option<String>,
}

/// Text fields after validation.
#[derive(Debug, Clone)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub description: String,
    pub category_id: String,
    pub quantity: u32,
}

/// Validate the text fields of a create/update request. All violations are
/// collected so the caller sees every failing field at once. The category
/// reference is resolved against the database.
pub fn validate_form(db: &Database, form: &BookForm) -> Result<BookFields, BookError> {
    let mut errors = Vec::new();

    let title = require_text("title", &form.title, &mut errors);
    let author = require_text("author", &form.author, &mut errors);
    let description = require_text("description", &form.description, &mut errors);
    let category_id = require_text("category_id", &form.category_id, &mut errors);

    let quantity = match &form.quantity {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<u32>() {
            Ok(q) => Some(q),
            Err(_) => {
                errors.push(FieldError {
                    field: "quantity",
                    reason: FieldReason::NotAnInteger,
                });
                None
            }
        },
        _ => {
            errors.push(FieldError {
                field: "quantity",
                reason: FieldReason::Required,
            });
            None
        }
    };

    if let Some(ref id) = category_id {
        if !category_resolves(db, id)? {
            errors.push(FieldError {
                field: "category_id",
                reason: FieldReason::UnknownCategory,
            });
        }
    }

    if !errors.is_empty() {
        return Err(BookError::Validation(errors));
    }

    // All Nones produced a FieldError above, so unwrapping here is unreachable
    // only through a logic bug; keep it explicit.
    match (title, author, description, category_id, quantity) {
        (Some(title), Some(author), Some(description), Some(category_id), Some(quantity)) => {
            Ok(BookFields {
                title,
                author,
                description,
                category_id,
                quantity,
            })
        }
        _ => Err(BookError::Validation(vec![FieldError {
            field: "form",
            reason: FieldReason::Required,
        }])),
    }
}

fn require_text(
    field: &'static str,
    value: &Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => {
            errors.push(FieldError {
                field,
                reason: FieldReason::Required,
            });
            None
        }
    }
}

fn category_resolves(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.category_exists(id)
}

/// Validate an uploaded PDF against mime type and size limits.
pub fn validate_pdf(upload: &FileUpload, limits: &UploadLimits) -> Option<FieldError> {
    if upload.mime_type().as_deref() != Some("application/pdf") {
        return Some(FieldError {
            field: "pdf",
            reason: FieldReason::NotAPdf,
        });
    }
    if upload.data.len() as u64 > limits.max_pdf_size {
        return Some(FieldError {
            field: "pdf",
            reason: FieldReason::TooLarge {
                limit: limits.max_pdf_size,
            },
        });
    }
    None
}

/// Validate an uploaded cover image against mime type and size limits.
pub fn validate_cover(upload: &FileUpload, limits: &UploadLimits) -> Option<FieldError> {
    match upload.mime_type().as_deref() {
        Some("image/jpeg") | Some("image/png") => {}
        _ => {
            return Some(FieldError {
                field: "cover",
                reason: FieldReason::NotAnImage,
            });
        }
    }
    if upload.data.len() as u64 > limits.max_cover_size {
        return Some(FieldError {
            field: "cover",
            reason: FieldReason::TooLarge {
                limit: limits.max_cover_size,
            },
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn upload(name: &str, content_type: Option<&str>, size: usize) -> FileUpload {
        FileUpload {
            file_name: Some(name.to_string()),
            content_type: content_type.map(|s| s.to_string()),
            data: Bytes::from(vec![0u8; size]),
        }
    }

    fn limits() -> UploadLimits {
        UploadLimits {
            max_pdf_size: 10 * 1024 * 1024,
            max_cover_size: 2 * 1024 * 1024,
        }
    }

    #[test]
    fn pdf_accepts_declared_content_type() {
        let u = upload("book.pdf", Some("application/pdf"), 128);
        assert!(validate_pdf(&u, &limits()).is_none());
    }

    #[test]
    fn pdf_falls_back_to_filename_guess() {
        let u = upload("book.pdf", None, 128);
        assert!(validate_pdf(&u, &limits()).is_none());
    }

    #[test]
    fn pdf_rejects_wrong_mime() {
        let u = upload("book.txt", Some("text/plain"), 128);
        let err = validate_pdf(&u, &limits()).expect("should reject");
        assert_eq!(err.field, "pdf");
        assert_eq!(err.reason, FieldReason::NotAPdf);
    }

    #[test]
    fn pdf_rejects_oversize() {
        let u = upload("book.pdf", Some("application/pdf"), 11 * 1024 * 1024);
        let err = validate_pdf(&u, &limits()).expect("should reject");
        assert!(matches!(err.reason, FieldReason::TooLarge { .. }));
    }

    #[test]
    fn cover_accepts_jpeg_and_png() {
        assert!(validate_cover(&upload("c.jpg", Some("image/jpeg"), 64), &limits()).is_none());
        assert!(validate_cover(&upload("c.png", Some("image/png"), 64), &limits()).is_none());
    }

    #[test]
    fn cover_rejects_gif() {
        let err = validate_cover(&upload("c.gif", Some("image/gif"), 64), &limits())
            .expect("should reject");
        assert_eq!(err.field, "cover");
        assert_eq!(err.reason, FieldReason::NotAnImage);
    }

    #[test]
    fn cover_rejects_oversize() {
        let u = upload("c.png", Some("image/png"), 3 * 1024 * 1024);
        let err = validate_cover(&u, &limits()).expect("should reject");
        assert!(matches!(err.reason, FieldReason::TooLarge { .. }));
    }
}
