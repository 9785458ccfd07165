use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use shipyard_auth::{AccessTokenError, Rejection};

/// `{ "message": ... }` with the given status.
pub fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "message": message.into() }))).into_response()
}

/// The fixed response for a failed authentication. Never carries the cause.
pub fn rejection_response(rejection: Rejection) -> Response {
    let status = match rejection {
        Rejection::NotLoggedIn | Rejection::CouldNotProcess => StatusCode::UNAUTHORIZED,
        Rejection::UserNotFound => StatusCode::NOT_FOUND,
    };
    message(status, rejection.message())
}

pub fn token_error_to_response(err: AccessTokenError) -> Response {
    match err {
        AccessTokenError::DuplicateName(_) | AccessTokenError::DuplicateKey => {
            message(StatusCode::CONFLICT, err.to_string())
        }
        AccessTokenError::InvalidPermissionSet(_) | AccessTokenError::MissingField(_) => {
            message(StatusCode::BAD_REQUEST, err.to_string())
        }
        AccessTokenError::NotFound(_) => message(StatusCode::NOT_FOUND, err.to_string()),
        AccessTokenError::Store(e) => {
            tracing::error!(error = %e, "access token store failed");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
