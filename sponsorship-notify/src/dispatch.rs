//! Sponsorship notification dispatch.
//!
//! ## Processing Flow
//!
//! ```text
//! body + signature → verify → decode → gate on "created" → upload → post
//! ```
//!
//! Each step either continues or stops the notification with a
//! [`DispatchError`] that maps onto an HTTP status.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::asset::MediaAsset;
use crate::event::SponsorshipEvent;
use crate::platform::{MediaPlatform, PostRequest, PublishError};
use crate::web::signature::verify_signature;

/// Why a notification was rejected or failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Missing X-Hub-Signature-256")]
    MissingSignature,

    #[error("Failed to read request body")]
    BodyUnreadable,

    #[error("Wrong signature")]
    BadSignature,

    #[error("Failed to parse request body")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to send notify")]
    Publish(#[source] PublishError),
}

impl DispatchError {
    /// HTTP status reported to the webhook sender.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::MissingSignature | DispatchError::BadSignature => StatusCode::FORBIDDEN,
            DispatchError::BodyUnreadable
            | DispatchError::Decode(_)
            | DispatchError::Publish(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// What a successfully handled notification did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event was not a new sponsorship.
    Ignored { action: Option<String> },
    /// A thank-you post was published with this media id.
    Published { media_id: String },
}

/// Verifies, decodes and acts on sponsorship webhooks.
///
/// Holds only read-only state, so one instance serves all requests.
#[derive(Clone)]
pub struct NotificationDispatcher {
    webhook_secret: Arc<str>,
    platform: Arc<dyn MediaPlatform>,
    asset: Arc<MediaAsset>,
    publish_timeout: Option<Duration>,
}

impl NotificationDispatcher {
    pub fn new(
        webhook_secret: impl Into<Arc<str>>,
        platform: Arc<dyn MediaPlatform>,
        asset: Arc<MediaAsset>,
        publish_timeout: Option<Duration>,
    ) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
            platform,
            asset,
            publish_timeout,
        }
    }

    /// Handle one delivery.
    pub async fn handle(&self, body: &[u8], signature: &str) -> Result<Outcome, DispatchError> {
        if signature.is_empty() {
            warn!("webhook_signature_missing");
            return Err(DispatchError::MissingSignature);
        }

        if !verify_signature(body, signature, &self.webhook_secret) {
            warn!(body_length = body.len(), "webhook_signature_invalid");
            return Err(DispatchError::BadSignature);
        }

        let event = SponsorshipEvent::from_slice(body).map_err(|e| {
            warn!(error = %e, "webhook_decode_failed");
            DispatchError::Decode(e)
        })?;

        info!(
            action = event.action.as_deref().unwrap_or(""),
            sponsor = event.sponsor_login().unwrap_or(""),
            tier = event.tier_name().unwrap_or(""),
            "sponsorship_event_received"
        );

        if !event.is_created() {
            info!(action = event.action.as_deref().unwrap_or(""), "sponsorship_event_ignored");
            return Ok(Outcome::Ignored {
                action: event.action,
            });
        }

        let media_id = self.publish().await.map_err(|e| {
            error!(error = %e, "sponsorship_notify_failed");
            DispatchError::Publish(e)
        })?;

        info!(media_id = %media_id, "sponsorship_notify_published");

        Ok(Outcome::Published { media_id })
    }

    /// Run the publish sequence, under the deadline if one is configured.
    /// Dropping the inner future on timeout aborts any in-flight call.
    async fn publish(&self) -> Result<String, PublishError> {
        let sequence = publish_thank_you(self.platform.as_ref(), &self.asset);

        match self.publish_timeout {
            Some(deadline) => tokio::time::timeout(deadline, sequence)
                .await
                .map_err(|_| PublishError::Timeout(deadline))?,
            None => sequence.await,
        }
    }
}

/// Upload the asset, then create a post that references the new media id.
///
/// Returns the media id used by the post.
pub async fn publish_thank_you(
    platform: &dyn MediaPlatform,
    asset: &MediaAsset,
) -> Result<String, PublishError> {
    let media_id = platform.upload_media(asset).await?.into_media_id()?;
    let post = PostRequest::celebration(media_id.clone());
    platform.create_post(&post).await?;
    Ok(media_id)
}
