//! HTTP request handlers

use super::auth::{require_user, require_webhook_token};
use super::types::ActionCallbackRequest;
use super::AppState;
use crate::chat::InboundPost;
use crate::db::ExpenseState;
use crate::runtime::{ApprovalError, CallbackContext};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    // Approve / reject buttons
    let callbacks = Router::new()
        .route("/api/expenses/:id/:state", post(update_expense))
        .route_layer(middleware::from_fn(require_user));

    // New-message events
    let events = Router::new()
        .route("/api/events/posted", post(message_posted))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_webhook_token,
        ));

    Router::new()
        .merge(callbacks)
        .merge(events)
        .route("/version", get(get_version))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

// ============================================================
// Approval Callback
// ============================================================

// Bodies are parsed by hand so every malformed payload is a 400
async fn update_expense(
    State(state): State<AppState>,
    Path((expense_id, target)): Path<(String, String)>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let request: ActionCallbackRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to decode action callback");
        AppError::BadRequest("invalid request".to_string())
    })?;
    let target: ExpenseState = target
        .parse()
        .map_err(|e: crate::db::UnknownExpenseState| AppError::BadRequest(e.to_string()))?;

    tracing::info!(
        expense_id = %expense_id,
        state = %target,
        user_id = %request.user_id,
        post_id = %request.post_id,
        "Updating expense"
    );

    let callback = CallbackContext {
        post_id: request.post_id,
        channel_id: request.channel_id,
    };
    state
        .approvals
        .apply_state_change(&expense_id, target, &callback)
        .await?;

    Ok("OK")
}

// ============================================================
// Event Webhook
// ============================================================

async fn message_posted(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let post: InboundPost = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to decode posted event");
        AppError::BadRequest("invalid event".to_string())
    })?;

    // The engine logs failures and tells the user; the event itself was accepted
    let _ = state.engine.handle_post(&post).await;

    Ok("OK")
}

async fn get_version() -> &'static str {
    concat!("expense-bot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Panic in handler");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<ApprovalError> for AppError {
    fn from(err: ApprovalError) -> Self {
        match err {
            ApprovalError::NotFound(_) => AppError::NotFound(err.to_string()),
            ApprovalError::Store(_) | ApprovalError::Partial { .. } => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}
