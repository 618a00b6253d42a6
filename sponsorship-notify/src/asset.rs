//! The image attached to every thank-you post.

use std::path::Path;

use thiserror::Error;

/// Image compiled into the binary.
const BUNDLED_IMAGE: &[u8] = include_bytes!("../assets/image.png");

/// Errors loading a media asset at startup.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("image {0} is empty")]
    Empty(String),
}

/// Immutable binary blob uploaded as the post's media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

impl MediaAsset {
    /// The bundled PNG.
    pub fn bundled() -> Self {
        Self {
            bytes: BUNDLED_IMAGE.to_vec(),
            file_name: "image.png".to_string(),
            mime: "image/png",
        }
    }

    /// Load an image from disk. The multipart file name stays `image.png`.
    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
            path: display.clone(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(AssetError::Empty(display));
        }

        Ok(Self {
            bytes,
            file_name: "image.png".to_string(),
            mime: "image/png",
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
