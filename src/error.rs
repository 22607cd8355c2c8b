/// Request-level error taxonomy.
/// Every handler returns `Result<HttpResponse, ApiError>`; the
/// `ResponseError` impl renders the failure into the common
/// `{ success: false, error: ... }` envelope with the matching status.
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/invalid field or violated uniqueness constraint (400)
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or expired token, or bad credentials (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Valid token, wrong role (403)
    #[error("{0}")]
    Forbidden(String),

    /// No record with the given id (404)
    #[error("{0}")]
    NotFound(String),

    /// Persistence failure, surfaced verbatim (500)
    #[error("{0}")]
    Database(#[from] rusqlite::Error),

    /// Credential/token primitive failure, surfaced verbatim (500)
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("no".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_error_message_is_verbatim() {
        let err = ApiError::from(rusqlite::Error::InvalidQuery);
        assert_eq!(err.to_string(), rusqlite::Error::InvalidQuery.to_string());
    }
}
