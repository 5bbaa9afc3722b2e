//! REST API module.
//!
//! All handlers return the `{ success, data, warning? }` envelope; errors
//! surface through `AppError`'s response mapping. Failures the repository
//! layer absorbed never appear here at all.

mod auth;
mod catalog;
mod inventory;
mod settings;

pub use auth::*;
pub use catalog::*;
pub use inventory::*;
pub use settings::*;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            warning: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Create a successful API response carrying a non-blocking warning.
pub fn success_with_warning<T: Serialize>(data: T, warning: &str) -> ApiResult<T> {
    Ok(ApiResponse {
        success: true,
        data,
        warning: Some(warning.to_string()),
    })
}

/// Runtime mode report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub backend: &'static str,
    pub fallback_mode: bool,
}

/// GET /api/status - Which backend is active and whether we degraded.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusResponse> {
    success(StatusResponse {
        backend: state.backend.name(),
        fallback_mode: state.fallback_mode,
    })
}

/// Build a JSON file download response with a date-stamped filename.
pub(crate) fn json_attachment(filename: String, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
