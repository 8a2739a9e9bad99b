use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::database::paging::{Page, Paging};

/// Wrapper for API responses that adds the `{ "data": ... }` envelope,
/// with an optional `paging` block for list endpoints.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub paging: Option<Paging>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            paging: None,
            status_code: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            data,
            paging: None,
            status_code: Some(StatusCode::CREATED),
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Create a 200 response from one page of items plus its paging block
    pub fn page(page: Page<T>) -> Self {
        Self {
            data: page.items,
            paging: Some(page.paging),
            status_code: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "errors": "Failed to serialize response data" })),
                )
                    .into_response();
            }
        };

        let envelope = match &self.paging {
            Some(paging) => json!({ "data": data_value, "paging": paging }),
            None => json!({ "data": data_value }),
        };

        (status, Json(envelope)).into_response()
    }
}

// Convenience type alias used by every handler
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
