use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::calc::geo::GeoError;
use crate::calc::month::MonthParseError;

/// Engine failure taxonomy. Validation and business-rule rejections carry the
/// reason verbatim to the caller; database failures surface as a generic 500.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BusinessRule(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database failure")]
    Database(#[from] sqlx::Error),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<GeoError> for EngineError {
    fn from(err: GeoError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<MonthParseError> for EngineError {
    fn from(err: MonthParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl actix_web::ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BusinessRule(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database failure");
                HttpResponse::InternalServerError().json(json!({
                    "message": "Internal Server Error"
                }))
            }
            other => HttpResponse::build(self.status_code()).json(json!({
                "message": other.to_string()
            })),
        }
    }
}
