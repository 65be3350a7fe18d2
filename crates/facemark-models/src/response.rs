use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::face::FaceBox;

/// URLs of the persisted images (disk output mode).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoredImages {
    /// Relative URL of the uploaded original
    pub original_url: String,
    /// Relative URL of the copy with outlined, numbered faces
    pub marked_url: String,
    /// Relative URL of the copy with blurred faces
    pub blurred_url: String,
    /// Sanitized name of the uploaded file
    pub original_name: String,
}

/// Base64-encoded result images (inline output mode).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InlineImages {
    /// Marked copy as a Base64 JPEG string
    pub marked_image: String,
    /// Blurred copy as a Base64 JPEG string
    pub blurred_image: String,
}

/// Successful response of `POST /upload`.
///
/// Exactly one of `stored` / `inline` is present, depending on the server's
/// output mode; both flatten into the top-level JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub face_count: usize,
    pub faces: Vec<FaceBox>,
    pub timestamp: String,
    #[serde(flatten)]
    pub stored: Option<StoredImages>,
    #[serde(flatten)]
    pub inline: Option<InlineImages>,
}

impl UploadResponse {
    /// Response for disk output mode.
    pub fn stored(faces: Vec<FaceBox>, timestamp: String, images: StoredImages) -> Self {
        Self {
            success: true,
            face_count: faces.len(),
            faces,
            timestamp,
            stored: Some(images),
            inline: None,
        }
    }

    /// Response for inline (Base64) output mode.
    pub fn inline(faces: Vec<FaceBox>, timestamp: String, images: InlineImages) -> Self {
        Self {
            success: true,
            face_count: faces.len(),
            faces,
            timestamp,
            stored: None,
            inline: Some(images),
        }
    }
}
