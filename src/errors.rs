use actix_web::HttpResponse;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::errors::DomainError;
use crate::domain::revenue::RevenueQueryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::BookNotFound(_) | DomainError::OrderNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            DomainError::InvalidInput(_) | DomainError::Conflict(_) => {
                AppError::BadRequest(e.to_string())
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RevenueQueryError> for AppError {
    fn from(e: RevenueQueryError) -> Self {
        match e {
            RevenueQueryError::Store(inner) => inner.into(),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<tera::Error> for AppError {
    fn from(e: tera::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Internal(msg) => {
                log::error!("request failed: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

/// Failures while bootstrapping one of the binaries.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("database pool: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("migrations: {0}")]
    Migration(String),
    #[error("templates: {0}")]
    Template(#[from] tera::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
