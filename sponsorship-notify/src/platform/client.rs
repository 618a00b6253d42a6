//! HTTP client for the X (Twitter) media upload and post creation APIs.

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, multipart, Client};
use tracing::{debug, info, warn};
use url::Url;

use super::{MediaPlatform, OAuthSigner, PostRequest, PublishError, UploadResult};
use crate::asset::MediaAsset;
use crate::config::Config;

/// OAuth 1.0a signed client for the two publish calls.
#[derive(Debug, Clone)]
pub struct XClient {
    client: Client,
    signer: OAuthSigner,
    upload_url: Url,
    post_url: Url,
}

impl XClient {
    /// Create a client from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self, PublishError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(config, client))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(config: &Config, client: Client) -> Self {
        Self {
            client,
            signer: OAuthSigner::new(config.credentials.clone()),
            upload_url: config.upload_url.clone(),
            post_url: config.post_url.clone(),
        }
    }

    fn authorization(&self, url: &Url) -> Result<String, PublishError> {
        self.signer
            .authorization("POST", url)
            .ok_or(PublishError::Signing)
    }
}

#[async_trait]
impl MediaPlatform for XClient {
    async fn upload_media(&self, asset: &MediaAsset) -> Result<UploadResult, PublishError> {
        debug!(
            url = %self.upload_url,
            size_bytes = asset.len(),
            "media_upload_starting"
        );

        let part = multipart::Part::bytes(asset.bytes.clone())
            .file_name(asset.file_name.clone())
            .mime_str(asset.mime)?;
        let form = multipart::Form::new().part("media", part);

        let response = self
            .client
            .post(self.upload_url.clone())
            .header(AUTHORIZATION, self.authorization(&self.upload_url)?)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PublishError::Api {
                endpoint: "media_upload",
                status: status.as_u16(),
                body,
            });
        }

        let result: UploadResult = serde_json::from_str(&body)
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;

        info!(
            status_code = status.as_u16(),
            media_id = result.media_id_string.as_deref().unwrap_or(""),
            "media_upload_complete"
        );

        Ok(result)
    }

    async fn create_post(&self, post: &PostRequest) -> Result<(), PublishError> {
        debug!(url = %self.post_url, media_ids = ?post.media.media_ids, "post_create_starting");

        let response = self
            .client
            .post(self.post_url.clone())
            .header(AUTHORIZATION, self.authorization(&self.post_url)?)
            .json(post)
            .send()
            .await?;

        let status = response.status();

        // The response is drained but not inspected; only transport failures
        // fail the notification.
        let body = response.text().await?;

        if status.is_success() {
            info!(status_code = status.as_u16(), "post_create_complete");
        } else {
            warn!(
                status_code = status.as_u16(),
                body_length = body.len(),
                "post_create_non_success_status"
            );
        }

        Ok(())
    }
}
