use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::response::{ApiError, AppJson, JSend};
use crate::books::validate::{FieldError, FieldReason};
use crate::storage::models::CategoryRecord;
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateCategoryRequest>,
) -> Result<Json<JSend<CategoryResponse>>, ApiError> {
    let name = match req.name {
        Some(ref name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            return Err(ApiError::Invalid(vec![FieldError {
                field: "name",
                reason: FieldReason::Required,
            }]));
        }
    };

    let category = CategoryRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        created_at: Utc::now(),
    };

    state
        .db
        .put_category(&category)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::debug!(category_id = %category.id, "Created category");
    Ok(JSend::success(category_to_response(&category)))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<CategoryListResponse>>, ApiError> {
    let categories = state
        .db
        .get_all_categories()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(CategoryListResponse {
        categories: categories.iter().map(category_to_response).collect(),
    }))
}

// ============================================================================
// Helpers
// ============================================================================

pub(super) fn category_to_response(category: &CategoryRecord) -> CategoryResponse {
    CategoryResponse {
        id: category.id.clone(),
        name: category.name.clone(),
        created_at: category.created_at.to_rfc3339(),
    }
}
