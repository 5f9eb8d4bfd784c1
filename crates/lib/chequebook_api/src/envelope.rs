//! Successful response bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chequebook_core::envelope::Envelope;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// A success envelope with its status code.
#[derive(Debug)]
pub struct ApiResponse {
    status: StatusCode,
    body: Envelope<Value>,
}

impl ApiResponse {
    /// 200 with `data`.
    pub fn ok<T: Serialize>(message: &str, data: &T) -> AppResult<Self> {
        Self::with_status(StatusCode::OK, message, data)
    }

    /// 201 with `data`.
    pub fn created<T: Serialize>(message: &str, data: &T) -> AppResult<Self> {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    pub fn with_status<T: Serialize>(status: StatusCode, message: &str, data: &T) -> AppResult<Self> {
        let data = serde_json::to_value(data).map_err(AppError::internal)?;
        Ok(Self {
            status,
            body: Envelope::success(message, data),
        })
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
