use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};

use shipyard_auth::{AccessTokenRegistry, AuthGate, Rejection};

use crate::app::errors;
use crate::authz::AdminPolicy;
use crate::context::{AuthContext, TokenContext};

/// Header carrying an access token key on the machine-to-machine surface.
pub const API_KEY_HEADER: &str = "x-api-key";

pub const INVALID_API_KEY: &str = "Invalid API key";

pub const ADMIN_REQUIRED: &str = "Administrator access required";

#[derive(Clone)]
pub struct AuthState {
    pub gate: AuthGate,
}

/// Bearer gate: nothing downstream runs unless the whole chain succeeded.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let header = match req.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(value) => Some(value.to_owned()),
            Err(_) => {
                tracing::warn!("request rejected: authorization header is not visible ASCII");
                return errors::rejection_response(Rejection::CouldNotProcess);
            }
        },
    };

    let ctx = match state.gate.authenticate(header.as_deref()).await {
        Ok(ctx) => ctx,
        Err(e) => return errors::rejection_response(e.rejection()),
    };

    req.extensions_mut().insert(AuthContext::new(ctx));
    next.run(req).await
}

/// Runs inside the bearer gate; the `AuthContext` is already present.
pub async fn admin_middleware(
    State(policy): State<AdminPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let allowed = req
        .extensions()
        .get::<AuthContext>()
        .is_some_and(|ctx| policy.allows(ctx.identity()));

    if !allowed {
        tracing::warn!("request rejected: token administration requires an admin");
        return errors::message(StatusCode::FORBIDDEN, ADMIN_REQUIRED);
    }

    next.run(req).await
}

#[derive(Clone)]
pub struct ApiKeyState {
    pub tokens: Arc<dyn AccessTokenRegistry>,
}

/// Resolves `X-Api-Key` to an access token. Scope checks are per route.
pub async fn api_key_middleware(
    State(state): State<ApiKeyState>,
    mut req: Request,
    next: Next,
) -> Response {
    let key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_owned);

    let Some(key) = key else {
        tracing::debug!("request rejected: no api key");
        return errors::message(StatusCode::UNAUTHORIZED, INVALID_API_KEY);
    };

    match state.tokens.find_by_key(&key).await {
        Ok(Some(token)) => {
            tracing::debug!(token = %token.name, "api key accepted");
            req.extensions_mut().insert(TokenContext::new(token));
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!("request rejected: unknown api key");
            errors::message(StatusCode::UNAUTHORIZED, INVALID_API_KEY)
        }
        Err(e) => {
            tracing::error!(error = %e, "api key lookup failed");
            errors::message(StatusCode::UNAUTHORIZED, INVALID_API_KEY)
        }
    }
}
