//! Machine-to-machine endpoints, authenticated by access token key.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::app::{errors, services::AppServices};
use crate::authz::{self, TOKENS_READ};
use crate::context::TokenContext;

pub const MISSING_PERMISSION: &str = "Missing required permission";

pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route("/tokens", get(list_token_names))
}

/// GET /m2m/whoami - the calling token's name and scopes.
pub async fn whoami(Extension(ctx): Extension<TokenContext>) -> impl IntoResponse {
    let token = ctx.token();
    Json(serde_json::json!({
        "name": token.name,
        "permissions": token.permissions,
    }))
}

/// GET /m2m/tokens - names of all tokens; requires `tokens.read`.
pub async fn list_token_names(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<TokenContext>,
) -> Response {
    if let Err(e) = authz::require_scope(&ctx, &TOKENS_READ) {
        tracing::warn!(token = %ctx.token().name, error = %e, "m2m request denied");
        return errors::message(StatusCode::FORBIDDEN, MISSING_PERMISSION);
    }

    match services.tokens.list().await {
        Ok(tokens) => {
            let names: Vec<&str> = tokens.iter().map(|t| t.name.as_str()).collect();
            Json(serde_json::json!({ "tokens": names })).into_response()
        }
        Err(e) => errors::token_error_to_response(e),
    }
}
