//! GitHub `sponsorship` webhook event.
//!
//! Only `action` drives behavior. The sponsor login and tier name are read
//! for logging when present in the expected shape; every other field is
//! ignored, and an unexpected shape never fails the decode.

use serde::Deserialize;
use serde_json::Value;

/// The action that triggers a thank-you post.
pub const CREATED_ACTION: &str = "created";

/// Decoded view of a sponsorship webhook body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SponsorshipEvent {
    #[serde(default)]
    pub action: Option<String>,
    /// Kept untyped; only used for log fields.
    #[serde(default)]
    pub sponsorship: Option<Value>,
}

impl SponsorshipEvent {
    /// Decode a raw JSON body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Whether this event announces a new sponsorship.
    pub fn is_created(&self) -> bool {
        self.action.as_deref() == Some(CREATED_ACTION)
    }

    pub fn sponsor_login(&self) -> Option<&str> {
        self.sponsorship
            .as_ref()?
            .get("sponsor")?
            .get("login")
            .and_then(Value::as_str)
    }

    pub fn tier_name(&self) -> Option<&str> {
        self.sponsorship
            .as_ref()?
            .get("tier")?
            .get("name")
            .and_then(Value::as_str)
    }
}
