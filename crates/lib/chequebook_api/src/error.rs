//! Application error types.
//!
//! Every failure leaves the API in the response envelope. Core errors map to
//! statuses here; internal failures are relabelled by the handler that hit
//! them (see [`OrFail`]).

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chequebook_core::auth::{AuthError, TokenError};
use chequebook_core::customers::{CustomerError, NOT_ELIGIBLE};
use chequebook_core::envelope::Envelope;
use chequebook_core::store::StoreError;
use chequebook_core::subscriptions::{SUBSCRIPTION_NOT_FOUND, SubscriptionError};
use chequebook_core::validation::FieldErrors;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::config::{ApiConfig, AppMode};

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        detail: Option<String>,
    },

    /// A business rule refused the request (e.g. an ineligible account).
    #[error("Rejected: {0}")]
    Rule(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{message}")]
    Internal {
        message: String,
        detail: Option<String>,
    },
}

impl AppError {
    pub fn unauthorized(message: &str) -> Self {
        AppError::Unauthorized {
            message: message.to_string(),
            detail: None,
        }
    }

    /// Internal failure with the generic message and `detail` as debug text.
    pub fn internal(detail: impl ToString) -> Self {
        AppError::Internal {
            message: INTERNAL_SERVER_ERROR.to_string(),
            detail: Some(detail.to_string()),
        }
    }

    /// Drops debug detail when `mode` does not expose it.
    pub fn for_mode(self, mode: AppMode) -> Self {
        if mode.exposes_error_detail() {
            return self;
        }
        match self {
            AppError::Unauthorized { message, .. } => AppError::Unauthorized {
                message,
                detail: None,
            },
            AppError::Internal { message, .. } => AppError::Internal {
                message,
                detail: None,
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Rule(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body: Envelope<Value> = match self {
            AppError::Validation(errors) => Envelope::failure("Validation failed").with_errors(errors),
            AppError::NotFound(m) | AppError::Rule(m) => Envelope::failure(&m),
            AppError::MethodNotAllowed => Envelope::failure("Method not allowed"),
            AppError::Unauthorized { message, detail } | AppError::Internal { message, detail } => {
                Envelope::failure(&message).with_error(detail)
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Relabels internal failures with a handler-specific message.
pub trait OrFail<T> {
    /// Logs an internal failure, replaces its message with `message` and strips
    /// the debug detail when the configured mode hides it. Other errors pass
    /// through unchanged.
    fn or_fail(self, config: &ApiConfig, message: &str) -> AppResult<T>;
}

impl<T, E: Into<AppError>> OrFail<T> for Result<T, E> {
    fn or_fail(self, config: &ApiConfig, message: &str) -> AppResult<T> {
        self.map_err(|e| match e.into() {
            AppError::Internal { detail, .. } => {
                error!(error = detail.as_deref().unwrap_or_default(), "{message}");
                AppError::Internal {
                    message: message.to_string(),
                    detail,
                }
                .for_mode(config.app_mode)
            }
            other => other,
        })
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::internal(e)
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AppError::unauthorized("Token has expired"),
            TokenError::Invalid => AppError::unauthorized("Invalid token"),
            TokenError::Verification(detail) => AppError::Unauthorized {
                message: "Token verification failed".into(),
                detail: Some(detail),
            },
            TokenError::Encode(detail) => AppError::internal(detail),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(errors) => AppError::Validation(errors),
            AuthError::UserNotFound => AppError::NotFound("User not found".into()),
            AuthError::CredentialError => AppError::unauthorized("Invalid credentials"),
            AuthError::Token(e) => AppError::from(e),
            AuthError::Store(e) => AppError::from(e),
            AuthError::Internal(msg) => AppError::internal(msg),
        }
    }
}

impl From<CustomerError> for AppError {
    fn from(e: CustomerError) -> Self {
        match e {
            CustomerError::Validation(errors) => AppError::Validation(errors),
            CustomerError::NotFound => AppError::NotFound("Customer account not found".into()),
            CustomerError::NotEligible => AppError::Rule(NOT_ELIGIBLE.into()),
            CustomerError::Store(e) => AppError::from(e),
        }
    }
}

impl From<SubscriptionError> for AppError {
    fn from(e: SubscriptionError) -> Self {
        match e {
            SubscriptionError::Validation(errors) => AppError::Validation(errors),
            SubscriptionError::NotFound => AppError::NotFound(SUBSCRIPTION_NOT_FOUND.into()),
            SubscriptionError::Store(e) => AppError::from(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(FieldErrors::single("body", &rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(FieldErrors::single("query", &rejection.body_text()))
    }
}
