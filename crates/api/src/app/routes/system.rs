use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::AuthContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /whoami - the resolved identity and whether a capability is bound.
pub async fn whoami(Extension(auth): Extension<AuthContext>) -> impl IntoResponse {
    let capability = auth
        .capability()
        .map(|cap| serde_json::json!({ "provider": cap.provider() }));

    Json(serde_json::json!({
        "identity": auth.identity(),
        "capability": capability,
    }))
}
