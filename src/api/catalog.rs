//! Catalog API endpoints.

use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::{json_attachment, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CatalogEntry, NormalizedEntry};
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string.
    #[serde(default)]
    pub q: String,
}

/// Lookup query parameters.
#[derive(Debug, Deserialize)]
pub struct FindQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub count: usize,
}

/// GET /api/catalog/search - Autocomplete search over the catalog.
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Vec<NormalizedEntry>> {
    success(state.catalog.search(&params.q).await)
}

/// GET /api/catalog/find - Resolve a single entry by name.
pub async fn find_catalog_entry(
    State(state): State<AppState>,
    Query(params): Query<FindQuery>,
) -> ApiResult<CatalogEntry> {
    match state.catalog.find_by_name(&params.name).await {
        Some(entry) => success(entry),
        None => Err(AppError::NotFound(format!(
            "No catalog entry matches {:?}",
            params.name
        ))),
    }
}

/// POST /api/catalog/refresh - Force the fetch chain and report the count.
pub async fn refresh_catalog(State(state): State<AppState>) -> ApiResult<RefreshResponse> {
    let entries = state.catalog.fetch_all().await;
    success(RefreshResponse {
        count: entries.len(),
    })
}

/// GET /api/catalog/export - Download the full catalog as JSON.
pub async fn export_catalog(State(state): State<AppState>) -> Response {
    let (filename, body) = state.catalog.export().await;
    json_attachment(filename, body)
}
