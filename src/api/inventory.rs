//! Inventory API endpoints.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::{json_attachment, success, success_with_warning, ApiResult};
use crate::errors::AppError;
use crate::models::{AddItemRequest, CollectionItem, User};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct SteamQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// GET /api/inventory - The session user's collection, newest first.
pub async fn list_items(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Vec<CollectionItem>> {
    success(state.inventory.list_items(&user.id).await)
}

/// POST /api/inventory - Add a skin to the collection.
///
/// Persistence degradation is reported through the warning field; only
/// input validation produces an error response.
pub async fn add_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<CollectionItem> {
    match state.inventory.add_item(&user.id, request).await {
        Ok((item, Some(warning))) => success_with_warning(item, warning),
        Ok((item, None)) => success(item),
        Err(e) => Err(e),
    }
}

/// DELETE /api/inventory/{id} - Remove an item; idempotent.
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    let deleted = state.inventory.remove_item(&user.id, &id).await;
    success(DeleteResponse { deleted })
}

/// GET /api/inventory/steam - Read-only mirror of the linked Steam
/// inventory (demo data).
pub async fn steam_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(params): Query<SteamQuery>,
) -> ApiResult<Vec<CollectionItem>> {
    let steam_id = user
        .steam_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("No Steam account is linked".to_string()))?;

    success(
        state
            .inventory
            .fetch_steam_inventory(&user.id, steam_id, params.refresh)
            .await,
    )
}

/// GET /api/inventory/export - Download the personal collection as JSON.
pub async fn export_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Response {
    let (filename, body) = state.inventory.export(&user.id).await;
    json_attachment(filename, body)
}
