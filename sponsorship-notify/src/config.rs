//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup. The five secrets are required;
//! everything else has a default.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::warn;
use url::Url;

/// Default media upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";

/// Default post creation endpoint.
pub const DEFAULT_POST_URL: &str = "https://api.twitter.com/2/tweets";

/// OAuth 1.0a credentials for the social platform.
#[derive(Clone)]
pub struct Credentials {
    /// Consumer (API) key
    pub client_token: String,
    /// Consumer (API) secret
    pub client_secret: String,
    /// User access token
    pub access_token: String,
    /// User access token secret
    pub access_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_token", &"<redacted>")
            .field("client_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Credentials used to sign every outbound platform call
    pub credentials: Credentials,

    /// Shared secret for `X-Hub-Signature-256` verification
    pub webhook_secret: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Media upload endpoint
    pub upload_url: Url,

    /// Post creation endpoint
    pub post_url: Url,

    /// Optional image replacing the bundled one
    pub image_path: Option<PathBuf>,

    /// Timeout for a single outbound request; unset keeps the transport default
    pub request_timeout: Option<Duration>,

    /// Deadline for the whole upload-then-post sequence; unset means none
    pub publish_timeout: Option<Duration>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("credentials", &self.credentials)
            .field("webhook_secret", &"<redacted>")
            .field("port", &self.port)
            .field("upload_url", &self.upload_url.as_str())
            .field("post_url", &self.post_url.as_str())
            .field("image_path", &self.image_path)
            .field("request_timeout", &self.request_timeout)
            .field("publish_timeout", &self.publish_timeout)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            credentials: Credentials {
                client_token: required("SPONSORSHIP_NOTIFY_CLIENT_TOKEN")?,
                client_secret: required("SPONSORSHIP_NOTIFY_CLIENT_SECRET")?,
                access_token: required("SPONSORSHIP_NOTIFY_ACCESS_TOKEN")?,
                access_secret: required("SPONSORSHIP_NOTIFY_ACCESS_SECRET")?,
            },

            webhook_secret: required("SPONSORSHIP_WEBHOOK_SECRET")?,

            port: parse_or("PORT", 5000),

            upload_url: parse_url("SPONSORSHIP_NOTIFY_UPLOAD_URL", DEFAULT_UPLOAD_URL)?,

            post_url: parse_url("SPONSORSHIP_NOTIFY_POST_URL", DEFAULT_POST_URL)?,

            image_path: env::var("SPONSORSHIP_NOTIFY_IMAGE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            request_timeout: parse_millis("REQUEST_TIMEOUT_MS"),

            publish_timeout: parse_millis("PUBLISH_TIMEOUT_MS"),
        })
    }
}

/// Read a required, non-blank variable.
fn required(name: &str) -> Result<String> {
    let value = env::var(name).with_context(|| format!("{name} is not set"))?;
    if value.trim().is_empty() {
        bail!("{name} is empty");
    }
    Ok(value)
}

/// Parse a numeric variable, falling back to `default` when absent or invalid.
fn parse_or<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

/// Parse an optional millisecond duration. Absent, zero or invalid means unset.
fn parse_millis(name: &str) -> Option<Duration> {
    let raw = env::var(name).ok()?;

    match raw.trim().parse::<u64>() {
        Ok(0) => None,
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid duration, ignoring");
            None
        }
    }
}

fn parse_url(name: &str, default: &str) -> Result<Url> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).with_context(|| format!("{name} is not a valid URL: {raw}"))
}
