//! Webhook endpoint handler.
//!
//! The handler runs the whole notification before answering: GitHub gets
//! its response only after any thank-you post has been published.

use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::asset::MediaAsset;
use crate::dispatch::{DispatchError, NotificationDispatcher};
use crate::platform::MediaPlatform;
use crate::web::signature::SIGNATURE_HEADER;
use crate::Config;

/// GitHub caps webhook payloads at 25 MB.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    pub fn new(config: &Config, platform: Arc<dyn MediaPlatform>, asset: MediaAsset) -> Self {
        Self {
            dispatcher: NotificationDispatcher::new(
                config.webhook_secret.as_str(),
                platform,
                Arc::new(asset),
                config.publish_timeout,
            ),
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        (self.status(), format!("{self}\n")).into_response()
    }
}

/// Sponsorship webhook endpoint.
///
/// This endpoint:
/// 1. Rejects deliveries without `X-Hub-Signature-256`
/// 2. Reads the raw body
/// 3. Verifies, decodes and dispatches it
/// 4. Returns 200 OK once any thank-you post is published
pub async fn sponsorship_webhook(State(state): State<AppState>, request: Request) -> Response {
    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default();

    if signature.is_empty() {
        warn!("webhook_signature_missing");
        return DispatchError::MissingSignature.into_response();
    }

    let body = match to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "webhook_body_unreadable");
            return DispatchError::BodyUnreadable.into_response();
        }
    };

    info!(body_length = body.len(), "webhook_received");

    match state.dispatcher.handle(&body, &signature).await {
        Ok(outcome) => {
            info!(outcome = ?outcome, "webhook_handled");
            (StatusCode::OK, "OK\n").into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Any method other than POST.
pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "only POST is supported\n")
}
