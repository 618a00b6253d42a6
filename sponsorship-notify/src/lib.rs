//! sponsorship-notify - thanks new GitHub sponsors on X.
//!
//! The `sponsorship-notify` binary serves one webhook route. When GitHub
//! reports a newly created sponsorship, the service uploads a bundled image
//! and publishes a thank-you post referencing it.
//!
//! ## Architecture
//!
//! ```text
//! GitHub webhook → web (signature check) → dispatch → platform (upload → post)
//! ```

pub mod asset;
pub mod config;
pub mod dispatch;
pub mod event;
pub mod platform;
pub mod web;

// Re-export commonly used types
pub use asset::MediaAsset;
pub use config::{Config, Credentials};
pub use dispatch::{publish_thank_you, DispatchError, NotificationDispatcher, Outcome};
pub use event::SponsorshipEvent;
pub use platform::{MediaPlatform, PostRequest, PublishError, UploadResult, XClient};
pub use web::{router, AppState};
