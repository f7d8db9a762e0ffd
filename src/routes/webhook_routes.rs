use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, info, warn};

use super::AppState;
use crate::errors::AppError;
use crate::line::events::WebhookPayload;
use crate::line::signature::{self, SIGNATURE_HEADER};

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET `/callback`: reachability check used when registering the webhook URL
pub async fn verify_handler() -> &'static str {
    "OK"
}

/// POST `/callback`: signed event batch from the messaging platform
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    debug!("Webhook received ({} bytes)", body.len());

    if let Err(err) = authenticate(&state, &headers, &body) {
        warn!("Rejected webhook: {err}");
        return error_response(&err);
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            let err = AppError::InvalidPayload { message: e.to_string() };
            warn!("{err}");
            return error_response(&err);
        }
    };
    if let Some(destination) = &payload.destination {
        debug!("Webhook destination: {destination}");
    }

    let mut failed_replies = 0usize;
    for message in payload.into_messages() {
        info!("Handling message from user {}", message.user_id);
        let reply = state.controller.handle(&message.user_id, message.content).await;
        if let Err(e) = state.platform.reply_text(&message.reply_token, &reply).await {
            error!("Failed to send reply to user {}: {e}", message.user_id);
            failed_replies += 1;
        }
    }

    if failed_replies > 0 {
        return error_response(&AppError::platform(format!("{failed_replies} replies could not be sent")));
    }
    (StatusCode::OK, "OK").into_response()
}

// ── Helper ────────────────────────────────────────────────────────────────────

fn authenticate(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<(), AppError> {
    let Some(secret) = state.channel_secret.as_deref() else {
        error!("Channel secret is not configured; cannot verify webhook");
        return Err(AppError::InvalidSignature);
    };
    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::InvalidSignature)?;
    signature::verify(secret, body, provided)
}

fn error_response(err: &AppError) -> Response {
    if err.is_client_error() {
        (StatusCode::BAD_REQUEST, err.to_string()).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
