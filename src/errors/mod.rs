use std::io::Error as IoError;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

pub mod config;
pub mod service;
pub mod store;

pub use config::ConfigError;
pub use service::ShortenError;
pub use store::StoreError;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum AppError {
    // Request-level errors
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
    #[error("Startup error: {0}")]
    Startup(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<ShortenError> for AppError {
    fn from(err: ShortenError) -> Self {
        match err {
            ShortenError::Validation(msg) => AppError::Validation(msg),
            ShortenError::InvalidAlias(msg) => AppError::Validation(msg),
            ShortenError::AliasTaken(_) => AppError::Conflict(err.to_string()),
            ShortenError::AllocationExhausted { .. } => AppError::Unavailable(err.to_string()),
            ShortenError::NotFound(msg) => AppError::NotFound(msg),
            ShortenError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl AppError {
    fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Message safe to show a caller; internal details stay in the logs
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_)
            | AppError::Startup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_internal() {
            error!("Request failed: {}", self);
        }

        HttpResponse::build(self.status_code()).json(json!({ "error": self.public_message() }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn shorten_errors_map_to_status_codes() {
        let cases = [
            (ShortenError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ShortenError::InvalidAlias("bad".into()), StatusCode::BAD_REQUEST),
            (ShortenError::AliasTaken("taken".into()), StatusCode::CONFLICT),
            (
                ShortenError::AllocationExhausted { attempts: 5 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ShortenError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ShortenError::Store(StoreError::Conflict("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status_code(), expected);
        }
    }

    #[actix_web::test]
    async fn validation_message_is_returned_verbatim() {
        let body = body_of(AppError::Validation("URL is required".into())).await;
        assert_eq!(body, json!({ "error": "URL is required" }));
    }

    #[actix_web::test]
    async fn internal_detail_is_not_leaked() {
        let err = AppError::from(ShortenError::Store(StoreError::Timeout(
            std::time::Duration::from_millis(5),
        )));
        let body = body_of(err).await;
        assert_eq!(body, json!({ "error": INTERNAL_MESSAGE }));
    }

    #[actix_web::test]
    async fn alias_taken_names_the_alias() {
        let body = body_of(AppError::from(ShortenError::AliasTaken("promo".into()))).await;
        assert_eq!(body["error"], "Alias 'promo' is already taken");
    }
}
