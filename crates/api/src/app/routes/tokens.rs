//! Administrative access token endpoints (bearer-authenticated).

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use shipyard_auth::{generate_key, AccessTokenUpdate};

use crate::app::dto::{CreateTokenRequest, IssuedToken, TokenView};
use crate::app::{errors, services::AppServices};
use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_token).get(list_tokens))
        .route(
            "/:name",
            get(get_token).patch(update_token).delete(delete_token),
        )
        .route("/:name/rotate", post(rotate_token))
}

/// POST /tokens
pub async fn create_token(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<CreateTokenRequest>,
) -> Response {
    match services.tokens.create(body.into_new_token()).await {
        Ok(token) => {
            tracing::info!(
                token = %token.name,
                by = %auth.identity().subject_id(),
                "access token issued"
            );
            (StatusCode::CREATED, Json(IssuedToken::from(token))).into_response()
        }
        Err(e) => errors::token_error_to_response(e),
    }
}

/// GET /tokens
pub async fn list_tokens(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.tokens.list().await {
        Ok(tokens) => {
            let tokens: Vec<TokenView> = tokens.iter().map(TokenView::from).collect();
            Json(serde_json::json!({ "tokens": tokens })).into_response()
        }
        Err(e) => errors::token_error_to_response(e),
    }
}

/// GET /tokens/:name
pub async fn get_token(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> Response {
    match services.tokens.find_by_name(&name).await {
        Ok(Some(token)) => Json(TokenView::from(&token)).into_response(),
        Ok(None) => errors::message(StatusCode::NOT_FOUND, "Access token not found"),
        Err(e) => errors::token_error_to_response(e),
    }
}

/// PATCH /tokens/:name
pub async fn update_token(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
    Json(update): Json<AccessTokenUpdate>,
) -> Response {
    match services.tokens.update(&name, update).await {
        Ok(token) => Json(TokenView::from(&token)).into_response(),
        Err(e) => errors::token_error_to_response(e),
    }
}

/// POST /tokens/:name/rotate
pub async fn rotate_token(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> Response {
    match services.tokens.rotate_key(&name, generate_key()).await {
        Ok(token) => Json(IssuedToken::from(token)).into_response(),
        Err(e) => errors::token_error_to_response(e),
    }
}

/// DELETE /tokens/:name
pub async fn delete_token(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(name): Path<String>,
) -> Response {
    match services.tokens.delete(&name).await {
        Ok(token) => {
            tracing::info!(
                token = %token.name,
                by = %auth.identity().subject_id(),
                "access token revoked"
            );
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::token_error_to_response(e),
    }
}
