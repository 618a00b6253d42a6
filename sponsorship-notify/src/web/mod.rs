//! Web server module for handling inbound webhooks.
//!
//! This module provides a single-route web server that:
//! - Receives GitHub `sponsorship` webhooks
//! - Verifies the HMAC-SHA256 signature
//! - Publishes a thank-you post for new sponsorships before responding

pub mod handlers;
pub mod signature;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{method_not_allowed, sponsorship_webhook, AppState, MAX_BODY_BYTES};
pub use signature::{sign_payload, verify_signature, SIGNATURE_HEADER};

/// Build the router: every path accepts `POST`, any other method gets 405.
pub fn router(state: AppState) -> Router {
    let webhook = post(sponsorship_webhook).fallback(method_not_allowed);

    // `/*path` does not match the bare root, so both are registered.
    Router::new()
        .route("/", webhook.clone())
        .route("/*path", webhook)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
