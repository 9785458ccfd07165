use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::authz::AdminPolicy;
use crate::middleware::admin_middleware;

pub mod m2m;
pub mod system;
pub mod tokens;

/// Router for all bearer-authenticated endpoints.
pub fn router(admins: AdminPolicy) -> Router {
    Router::new().route("/whoami", get(system::whoami)).nest(
        "/tokens",
        tokens::router().route_layer(from_fn_with_state(admins, admin_middleware)),
    )
}
