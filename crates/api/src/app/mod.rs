//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores and the auth gate built from them
//! - `routes/`: handlers, one file per surface
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: the fixed `{ "message": ... }` error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware::{self, ApiKeyState, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig, services: Arc<services::AppServices>) -> Router {
    let auth_state = AuthState {
        gate: services.gate(config.verifier.clone()),
    };
    let api_key_state = ApiKeyState {
        tokens: services.tokens.clone(),
    };

    // Bearer-authenticated routes.
    let protected = routes::router(config.admins.clone()).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(services.clone())),
    );

    // Access-token (machine-to-machine) routes.
    let m2m = routes::m2m::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                api_key_state,
                middleware::api_key_middleware,
            ))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/m2m", m2m)
        .merge(protected)
}
