//! Image decoding.

use image::RgbImage;

use crate::error::{VisionError, VisionResult};

/// Decode raw upload bytes into an RGB raster.
///
/// Corrupt bytes, zero-byte payloads, and non-image content all surface as
/// [`VisionError::Decode`]; detection is never attempted on them.
pub fn decode_image(bytes: &[u8]) -> VisionResult<RgbImage> {
    if bytes.is_empty() {
        return Err(VisionError::decode("empty file"));
    }

    let img = image::load_from_memory(bytes).map_err(|e| VisionError::decode(e.to_string()))?;
    let rgb = img.to_rgb8();

    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(VisionError::ZeroDimensions);
    }

    Ok(rgb)
}
