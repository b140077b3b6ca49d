use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::response::{ApiError, JSend, MaybePrincipal, Principal};
use crate::books::validate::BookForm;
use crate::books::{self, FileUpload, UploadLimits};
use crate::storage::models::BookRecord;
use crate::AppState;

use super::categories::{category_to_response, CategoryResponse};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub category_id: String,
    pub quantity: u32,
    pub file_path: Option<String>,
    pub cover_path: Option<String>,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Vec<BookResponse>,
    pub owned: Vec<BookResponse>,
}

/// Mutation result: the record plus a flash-style status message.
#[derive(Debug, Serialize)]
pub struct BookMessageResponse {
    pub book: BookResponse,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EditBookResponse {
    pub book: BookResponse,
    pub categories: Vec<CategoryResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_books(
    State(state): State<Arc<AppState>>,
    MaybePrincipal(principal): MaybePrincipal,
) -> Result<Json<JSend<BookListResponse>>, ApiError> {
    let listing = books::list_books(&state.db, principal.as_deref())?;

    Ok(JSend::success(BookListResponse {
        books: listing.books.iter().map(book_to_response).collect(),
        owned: listing.owned.iter().map(book_to_response).collect(),
    }))
}

pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Principal(principal): Principal,
    multipart: Multipart,
) -> Result<Json<JSend<BookMessageResponse>>, ApiError> {
    let (form, pdf, cover) = parse_book_multipart(multipart).await?;
    let limits = UploadLimits::from(&state.config);

    let book = books::create_book(
        &state.db,
        state.object_store.as_ref(),
        &principal,
        form,
        pdf,
        cover,
        &limits,
    )
    .await?;

    Ok(JSend::success(BookMessageResponse {
        book: book_to_response(&book),
        message: "Book created successfully.".to_string(),
    }))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<BookResponse>>, ApiError> {
    let book = books::get_book(&state.db, &id)?;
    Ok(JSend::success(book_to_response(&book)))
}

pub async fn edit_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<EditBookResponse>>, ApiError> {
    let (book, categories) = books::edit_book(&state.db, &id)?;

    Ok(JSend::success(EditBookResponse {
        book: book_to_response(&book),
        categories: categories.iter().map(category_to_response).collect(),
    }))
}

pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<JSend<BookMessageResponse>>, ApiError> {
    let (form, pdf, cover) = parse_book_multipart(multipart).await?;
    let limits = UploadLimits::from(&state.config);

    let book = books::update_book(
        &state.db,
        state.object_store.as_ref(),
        &id,
        form,
        pdf,
        cover,
        &limits,
    )
    .await?;

    Ok(JSend::success(BookMessageResponse {
        book: book_to_response(&book),
        message: "Book updated successfully.".to_string(),
    }))
}

pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JSend<DeletedResponse>>, ApiError> {
    books::delete_book(&state.db, state.object_store.as_ref(), &id).await?;

    Ok(JSend::success(DeletedResponse {
        message: "Book deleted successfully.".to_string(),
    }))
}

/// Serve a book's PDF content.
/// Route: GET /books/:id/pdf
pub async fn view_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let data = books::load_pdf(&state.db, state.object_store.as_ref(), &id).await?;

    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/pdf"),
    );

    if let Ok(value) = format!("inline; filename=\"{id}.pdf\"").parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

// ============================================================================
// Helpers
// ============================================================================

/// Pull the book form fields and the optional `pdf`/`cover` uploads out of a
/// multipart body. Unknown fields are ignored; presence/size/mime checks
/// happen later in validation.
async fn parse_book_multipart(
    mut multipart: Multipart,
) -> Result<(BookForm, Option<FileUpload>, Option<FileUpload>), ApiError> {
    let mut form = BookForm::default();
    let mut pdf: Option<FileUpload> = None;
    let mut cover: Option<FileUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart data: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "pdf" | "cover" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read {field_name}: {e}"))
                })?;

                let upload = FileUpload {
                    file_name,
                    content_type,
                    data,
                };
                if field_name == "pdf" {
                    pdf = Some(upload);
                } else {
                    cover = Some(upload);
                }
            }
            "title" => form.title = Some(read_text(field, "title").await?),
            "author" => form.author = Some(read_text(field, "author").await?),
            "description" => form.description = Some(read_text(field, "description").await?),
            "category_id" => form.category_id = Some(read_text(field, "category_id").await?),
            "quantity" => form.quantity = Some(read_text(field, "quantity").await?),
            _ => {
                // Ignore unknown fields
            }
        }
    }

    Ok((form, pdf, cover))
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid {name}: {e}")))
}

fn book_to_response(book: &BookRecord) -> BookResponse {
    BookResponse {
        id: book.id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        description: book.description.clone(),
        category_id: book.category_id.clone(),
        quantity: book.quantity,
        file_path: book.file_path.clone(),
        cover_path: book.cover_path.clone(),
        owner_id: book.owner_id.clone(),
        created_at: book.created_at.to_rfc3339(),
        updated_at: book.updated_at.to_rfc3339(),
    }
}
