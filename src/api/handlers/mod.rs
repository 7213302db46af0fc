//! API Handlers

pub mod absence_requests;
pub mod auth;
pub mod event_requests;
pub mod events;
pub mod google_auth;
pub mod health;
pub mod mentorships;
pub mod seasons;
pub mod technologies;
pub mod users;

use axum::http::StatusCode;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::support::DomainError;

/// Error shape shared by all handlers.
pub(crate) type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// Maps a domain error to its HTTP representation.
pub(crate) fn domain_error(err: DomainError) -> HandlerError {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

pub(crate) fn db_error(err: sea_orm::DbErr) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(format!("Database error: {}", err))),
    )
}

pub(crate) fn not_found(entity: &str, id: &str) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(format!(
            "{} with id={} not found",
            entity, id
        ))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (
                DomainError::NotFound {
                    entity: "User",
                    field: "id",
                    value: "u1".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Conflict("duplicate".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Validation("bad input".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Unauthorized("no token".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::Forbidden("admins only".to_string()),
                StatusCode::FORBIDDEN,
            ),
        ];
        for (err, expected) in cases {
            let (status, body) = domain_error(err);
            assert_eq!(status, expected);
            assert!(!body.0.success);
        }
    }
}
