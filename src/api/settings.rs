//! Settings API endpoints (admin surface).

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingValue {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSettingRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSettingResponse {
    pub saved: bool,
}

/// GET /api/settings/{key} - Resolve a setting (known keys fall back to
/// their compiled-in defaults).
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<SettingValue> {
    let value = state.settings.get(&key).await;
    success(SettingValue { key, value })
}

/// PUT /api/settings/{key} - Upsert a setting. Failure is reported as a
/// flag, not an error; the UI surfaces it as a notification.
pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<SetSettingRequest>,
) -> ApiResult<SetSettingResponse> {
    let saved = state.settings.set(&key, &request.value).await;
    success(SetSettingResponse { saved })
}
