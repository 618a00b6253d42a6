//! Social platform integration.
//!
//! A thank-you post is published in two calls: the image is uploaded first,
//! then a post is created that references the returned media id.
//!
//! ```text
//! MediaAsset → upload_media() → UploadResult → PostRequest → create_post()
//! ```

pub mod client;
pub mod oauth;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::MediaAsset;

pub use client::XClient;
pub use oauth::OAuthSigner;

/// Text of every thank-you post.
pub const THANK_YOU_TEXT: &str = "ありがとうございます 🤗 #GitHubSponsors";

/// Failures of the publish sequence. All are fatal for the notification.
#[derive(Debug, Error)]
pub enum PublishError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The OAuth signing key was rejected.
    #[error("failed to sign request")]
    Signing,

    /// The platform answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Api {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    /// The upload response could not be decoded.
    #[error("invalid upload response: {0}")]
    InvalidResponse(String),

    /// The upload response carried no `media_id_string`.
    #[error("upload response is missing media_id_string")]
    MissingMediaId,

    /// The whole sequence did not finish in time.
    #[error("publish timed out after {0:?}")]
    Timeout(Duration),
}

/// Media upload response. Only the string id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub media_id_string: Option<String>,
}

impl UploadResult {
    /// The media id, if present and non-empty.
    pub fn into_media_id(self) -> Result<String, PublishError> {
        match self.media_id_string {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(PublishError::MissingMediaId),
        }
    }
}

/// Body of the post creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRequest {
    pub text: String,
    pub media: PostMedia,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMedia {
    pub media_ids: Vec<String>,
}

impl PostRequest {
    /// The thank-you post, attaching exactly one media id.
    pub fn celebration(media_id: String) -> Self {
        Self {
            text: THANK_YOU_TEXT.to_string(),
            media: PostMedia {
                media_ids: vec![media_id],
            },
        }
    }
}

/// The two calls of the publish sequence.
#[async_trait]
pub trait MediaPlatform: Send + Sync {
    /// Upload an image and return the platform's response.
    async fn upload_media(&self, asset: &MediaAsset) -> Result<UploadResult, PublishError>;

    /// Create a post. Only transport-level success is checked.
    async fn create_post(&self, post: &PostRequest) -> Result<(), PublishError>;
}
