//! Request authentication middleware

use super::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Header set by the chat server on requests from a logged-in user
pub const USER_ID_HEADER: &str = "Mattermost-User-ID";

/// Reject callback requests that do not come from an authenticated user
pub async fn require_user(request: Request, next: Next) -> Response {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if user_id.is_empty() {
        return (StatusCode::UNAUTHORIZED, "Not authorized").into_response();
    }

    tracing::debug!(user_id, "Authenticated callback");
    next.run(request).await
}

/// Check `Authorization: Bearer <token>` against the configured webhook token
///
/// With no token configured every request is rejected.
pub async fn require_webhook_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let config = state.config.snapshot();
    let Some(expected) = config.webhook_token.as_deref() else {
        tracing::error!("No webhook token configured, rejecting event");
        return (StatusCode::UNAUTHORIZED, "Not authorized").into_response();
    };

    let presented = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented != Some(expected) {
        tracing::warn!("Rejected event with missing or wrong token");
        return (StatusCode::UNAUTHORIZED, "Not authorized").into_response();
    }

    next.run(request).await
}
