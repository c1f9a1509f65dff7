//! Mapping from catalog errors to HTTP responses.
//!
//! The status code depends on the operation as well as the error: failures while creating or
//! updating are client faults (400), failures while listing, reading or deleting are server
//! faults (500). A missing record is always 404. The body is `{"message": <error text>}`.

use api_shared::MessageRes;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::CatalogError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Classifies an error raised while creating or updating a record.
    pub fn client(err: CatalogError) -> Self {
        Self::classify(err, StatusCode::BAD_REQUEST)
    }

    /// Classifies an error raised while listing, reading or deleting records.
    pub fn server(err: CatalogError) -> Self {
        Self::classify(err, StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn classify(err: CatalogError, fault_status: StatusCode) -> Self {
        let status = match err {
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => fault_status,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("request failed: {}", self.message);
        }
        (self.status, Json(MessageRes::new(self.message))).into_response()
    }
}
