//! Shared data models for the Facemark backend.
//!
//! This crate provides Serde-serializable types for:
//! - Face bounding boxes in pixel coordinates
//! - Upload response payloads (disk and inline output modes)
//! - Upload validation helpers and shared processing constants

pub mod face;
pub mod response;
pub mod upload;

// Re-export common types
pub use face::FaceBox;
pub use response::{InlineImages, StoredImages, UploadResponse};
pub use upload::{file_extension, is_allowed_extension, ALLOWED_EXTENSIONS};

/// JPEG quality used for every output image, regardless of input format.
pub const JPEG_QUALITY: u8 = 95;

/// Maximum accepted upload size in bytes (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
